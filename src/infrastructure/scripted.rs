use crate::domain::ports::{
    AvailabilityQuery, BookingClient, ConfirmRequest, DraftOrder, DraftValidation,
    SubmissionSession,
};
use crate::domain::train::AvailabilityRow;
use crate::error::{GrabError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Outcome of one scripted availability query.
#[derive(Debug, Clone)]
pub enum QueryScript {
    Rows(Vec<AvailabilityRow>),
    Fail(String),
}

#[derive(Default)]
struct Script {
    queries: Mutex<VecDeque<QueryScript>>,
    verification_required: RwLock<bool>,
    submit_rejection: RwLock<Option<String>>,
    confirm_rejection: RwLock<Option<String>>,
    calls: RwLock<Vec<String>>,
    drafts: RwLock<Vec<DraftOrder>>,
    confirms: RwLock<Vec<ConfirmRequest>>,
}

/// A booking service that replays a scripted sequence of availability
/// outcomes and records every call made against it.
///
/// Once the script is exhausted, further queries return no rows. Clones
/// share the same script and call log, so a test (or the rehearsal
/// binary) can keep a handle while the engine owns the boxed client.
#[derive(Default, Clone)]
pub struct ScriptedBookingClient {
    script: Arc<Script>,
}

impl ScriptedBookingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful availability response for the next query.
    pub async fn push_rows(&self, rows: Vec<AvailabilityRow>) {
        self.script
            .queries
            .lock()
            .await
            .push_back(QueryScript::Rows(rows));
    }

    /// Queues a failed availability query.
    pub async fn push_query_failure(&self, message: &str) {
        self.script
            .queries
            .lock()
            .await
            .push_back(QueryScript::Fail(message.to_string()));
    }

    /// Makes draft validation demand a verification code.
    pub async fn require_verification(&self) {
        *self.script.verification_required.write().await = true;
    }

    /// Makes the submit-intent notification fail.
    pub async fn reject_submit(&self, message: &str) {
        *self.script.submit_rejection.write().await = Some(message.to_string());
    }

    /// Makes the confirmation call fail.
    pub async fn reject_confirm(&self, message: &str) {
        *self.script.confirm_rejection.write().await = Some(message.to_string());
    }

    /// Names of the operations invoked so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.script.calls.read().await.clone()
    }

    pub async fn draft_orders(&self) -> Vec<DraftOrder> {
        self.script.drafts.read().await.clone()
    }

    pub async fn confirm_requests(&self) -> Vec<ConfirmRequest> {
        self.script.confirms.read().await.clone()
    }

    async fn record(&self, call: &str) {
        self.script.calls.write().await.push(call.to_string());
    }
}

#[async_trait]
impl BookingClient for ScriptedBookingClient {
    async fn get_query_endpoint(&self) -> Result<String> {
        self.record("get_query_endpoint").await;
        Ok("leftTicket/query".to_string())
    }

    async fn query_availability(&self, _query: AvailabilityQuery) -> Result<Vec<AvailabilityRow>> {
        self.record("query_availability").await;
        match self.script.queries.lock().await.pop_front() {
            Some(QueryScript::Rows(rows)) => Ok(rows),
            Some(QueryScript::Fail(message)) => Err(GrabError::Query(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn submit_order_request(
        &self,
        _train: &AvailabilityRow,
        _tour_flag: &str,
        _is_student: bool,
    ) -> Result<()> {
        self.record("submit_order_request").await;
        match self.script.submit_rejection.read().await.clone() {
            Some(message) => Err(GrabError::Service(message)),
            None => Ok(()),
        }
    }

    async fn init_submission(&self) -> Result<SubmissionSession> {
        self.record("init_submission").await;
        Ok(SubmissionSession {
            submit_token: "st-0001".to_string(),
            key_change: "kc-0001".to_string(),
        })
    }

    async fn validate_draft_order(&self, draft: DraftOrder) -> Result<DraftValidation> {
        self.record("validate_draft_order").await;
        self.script.drafts.write().await.push(draft);
        Ok(DraftValidation {
            verification_required: *self.script.verification_required.read().await,
        })
    }

    async fn confirm_submission(&self, request: ConfirmRequest) -> Result<()> {
        self.record("confirm_submission").await;
        self.script.confirms.write().await.push(request);
        match self.script.confirm_rejection.read().await.clone() {
            Some(message) => Err(GrabError::Service(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_queued_outcomes_in_order() {
        let client = ScriptedBookingClient::new();
        client.push_query_failure("timeout").await;
        client
            .push_rows(vec![AvailabilityRow {
                name: "G1".into(),
                ..Default::default()
            }])
            .await;

        let query = AvailabilityQuery {
            query_endpoint: "leftTicket/query".into(),
            origin_code: "BJP".into(),
            dest_code: "SHH".into(),
            date: "2026-10-01".into(),
        };
        assert!(client.query_availability(query.clone()).await.is_err());
        let rows = client.query_availability(query.clone()).await.unwrap();
        assert_eq!(rows[0].name, "G1");
        // Exhausted script yields an empty response, not an error.
        assert!(client.query_availability(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_calls_across_clones() {
        let client = ScriptedBookingClient::new();
        let handle = client.clone();
        client.get_query_endpoint().await.unwrap();
        client.init_submission().await.unwrap();
        assert_eq!(
            handle.calls().await,
            vec!["get_query_endpoint", "init_submission"]
        );
    }
}
