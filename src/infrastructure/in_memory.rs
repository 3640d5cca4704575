use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::StatusSink;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A status sink that records every published Order snapshot in memory.
///
/// Clones share the same backing store, so a test can keep a handle while
/// the engine owns the boxed sink.
#[derive(Default, Clone)]
pub struct MemoryStatusSink {
    snapshots: Arc<RwLock<Vec<Order>>>,
}

impl MemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots published so far, in order.
    pub async fn snapshots(&self) -> Vec<Order> {
        self.snapshots.read().await.clone()
    }

    /// The status sequence of the published snapshots.
    pub async fn statuses(&self) -> Vec<OrderStatus> {
        self.snapshots
            .read()
            .await
            .iter()
            .map(|order| order.status)
            .collect()
    }

    pub async fn last_status(&self) -> Option<OrderStatus> {
        self.snapshots.read().await.last().map(|order| order.status)
    }
}

#[async_trait]
impl StatusSink for MemoryStatusSink {
    async fn publish(&self, snapshot: Order) {
        self.snapshots.write().await.push(snapshot);
    }
}
