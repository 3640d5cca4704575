use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrabError {
    /// Availability query failure. The poller swallows this and treats it
    /// as "no match this tick".
    #[error("availability query failed: {0}")]
    Query(String),
    /// Submission-path rejection (notify, init session, validate, confirm).
    /// Propagates to the loop boundary and forces `fail`.
    #[error("booking service error: {0}")]
    Service(String),
    /// Operation attempted in a state that does not permit it.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GrabError>;
