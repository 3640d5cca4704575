use crate::domain::passenger::{Passenger, PassengerStrings};
use crate::domain::train::{AcceptablePair, AvailabilityRow, SeatClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Tour flag for a single-trip order, carried through the whole
/// submission protocol.
pub const TOUR_FLAG_SINGLE: &str = "dc";

/// A station endpoint: display name plus the wire code used in queries.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Station {
    pub name: String,
    pub code: String,
}

/// Lifecycle of one purchase attempt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrderStatus {
    /// Idle or cancelled. Initial state, and the only state a run may
    /// start from.
    Stop,
    /// Polling availability.
    Query,
    /// Match found, submission in progress.
    Submit,
    /// Waiting for a human-supplied verification code.
    ReadCheckCode,
    /// Order confirmed. Terminal.
    Success,
    /// Unrecoverable service error. Terminal.
    Fail,
}

impl OrderStatus {
    /// Whether the acquisition loop halts on this status.
    pub fn is_loop_terminal(&self) -> bool {
        matches!(self, Self::Stop | Self::Success | Self::Fail)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stop => "stop",
            Self::Query => "query",
            Self::Submit => "submit",
            Self::ReadCheckCode => "read-checkcode",
            Self::Success => "success",
            Self::Fail => "fail",
        };
        f.write_str(s)
    }
}

/// Caller-owned run parameters. Supplied once per run and never mutated by
/// the engine.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub origin: Option<Station>,
    pub destination: Option<Station>,
    pub date: Option<NaiveDate>,
    /// Delay between poll attempts.
    pub poll_interval: Duration,
    /// Acceptable (train, seat) pairs in ranked preference order.
    pub acceptable: Vec<AcceptablePair>,
    pub passengers: Vec<Passenger>,
    /// Query and purchase student fares instead of adult fares.
    pub student_fare: bool,
}

/// Engine-owned state of the current purchase attempt.
///
/// Created empty at engine construction and populated incrementally as the
/// attempt advances. External reads are clone snapshots; only the engine
/// mutates it.
#[derive(Debug, Clone)]
pub struct Order {
    pub status: OrderStatus,
    /// The availability row the attempt matched on.
    pub train: Option<AvailabilityRow>,
    pub seat: Option<SeatClass>,
    pub tour_flag: String,
    /// Submission session issued by the service for the current draft.
    pub submit_token: Option<String>,
    pub key_change: Option<String>,
    pub passenger_strings: Option<PassengerStrings>,
    /// Human-supplied code, present only after the service demanded one.
    pub verification_code: Option<String>,
    /// Set when the match is found; used to report elapsed time on success.
    pub started_at: Option<Instant>,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            status: OrderStatus::Stop,
            train: None,
            seat: None,
            tour_flag: TOUR_FLAG_SINGLE.to_string(),
            submit_token: None,
            key_change: None,
            passenger_strings: None,
            verification_code: None,
            started_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_order_is_stopped() {
        let order = Order::default();
        assert_eq!(order.status, OrderStatus::Stop);
        assert_eq!(order.tour_flag, "dc");
        assert!(order.train.is_none());
    }

    #[test]
    fn test_loop_terminal_statuses() {
        assert!(OrderStatus::Stop.is_loop_terminal());
        assert!(OrderStatus::Success.is_loop_terminal());
        assert!(OrderStatus::Fail.is_loop_terminal());
        assert!(!OrderStatus::Query.is_loop_terminal());
        assert!(!OrderStatus::Submit.is_loop_terminal());
        assert!(!OrderStatus::ReadCheckCode.is_loop_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OrderStatus::ReadCheckCode.to_string(), "read-checkcode");
        assert_eq!(OrderStatus::Query.to_string(), "query");
    }
}
