use crate::domain::order::Order;
use crate::domain::train::AvailabilityRow;
use crate::error::Result;
use async_trait::async_trait;

/// Parameters of one availability query. The date is pre-formatted
/// `YYYY-MM-DD` as the wire expects it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AvailabilityQuery {
    pub query_endpoint: String,
    pub origin_code: String,
    pub dest_code: String,
    pub date: String,
}

/// Token pair authorizing one confirm attempt against the current draft.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SubmissionSession {
    pub submit_token: String,
    pub key_change: String,
}

/// Draft order handed to the service for validation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DraftOrder {
    pub submit_token: String,
    pub tour_flag: String,
    pub passenger_manifest: String,
    pub passenger_registry: String,
}

/// Outcome of draft validation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DraftValidation {
    /// The service demands a human-supplied verification code before
    /// confirmation.
    pub verification_required: bool,
}

/// Final confirmation call payload.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConfirmRequest {
    /// Empty when no verification code was demanded.
    pub verification_code: String,
    pub train: AvailabilityRow,
    pub submit_token: String,
    pub key_change: String,
    pub passenger_manifest: String,
    pub passenger_registry: String,
}

/// The booking service surface consumed by the engine. Transport is the
/// implementor's concern; the engine only sees these operations.
#[async_trait]
pub trait BookingClient: Send + Sync {
    async fn get_query_endpoint(&self) -> Result<String>;
    async fn query_availability(&self, query: AvailabilityQuery) -> Result<Vec<AvailabilityRow>>;
    /// Notifies the service that a submission is starting for the matched
    /// train and fare type.
    async fn submit_order_request(
        &self,
        train: &AvailabilityRow,
        tour_flag: &str,
        is_student: bool,
    ) -> Result<()>;
    async fn init_submission(&self) -> Result<SubmissionSession>;
    async fn validate_draft_order(&self, draft: DraftOrder) -> Result<DraftValidation>;
    async fn confirm_submission(&self, request: ConfirmRequest) -> Result<()>;
}

/// Receives engine state transitions and Order field updates. Snapshots
/// are immutable copies; the sink never gets a mutable handle.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn publish(&self, snapshot: Order);
}

pub type BookingClientBox = Box<dyn BookingClient>;
pub type StatusSinkBox = Box<dyn StatusSink>;
