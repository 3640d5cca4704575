use crate::domain::order::{Input, Station};
use crate::domain::passenger::Passenger;
use crate::domain::train::{AcceptablePair, AvailabilityRow};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn default_poll_interval_ms() -> u64 {
    3000
}

/// One scripted availability outcome for a rehearsal run: either a failed
/// query (`fail` set) or a response with `rows`.
#[derive(Debug, Deserialize, Clone)]
pub struct RehearsalTick {
    #[serde(default)]
    pub fail: Option<String>,
    #[serde(default)]
    pub rows: Vec<AvailabilityRow>,
}

/// Scripted booking-service fixture driving a rehearsal run.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Rehearsal {
    #[serde(default)]
    pub ticks: Vec<RehearsalTick>,
    #[serde(default)]
    pub verification_required: bool,
    /// Code the rehearsal supplies automatically when validation demands
    /// one.
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// JSON run configuration: the route, the ranked train/seat preferences,
/// the passengers, and the rehearsal fixture the binary runs against.
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    pub origin: Station,
    pub destination: Station,
    /// Travel date, `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Acceptable (train, seat) pairs in ranked preference order.
    pub trains: Vec<AcceptablePair>,
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub student_fare: bool,
    #[serde(default)]
    pub rehearsal: Rehearsal,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The engine-facing view of this configuration.
    pub fn to_input(&self) -> Input {
        Input {
            origin: Some(self.origin.clone()),
            destination: Some(self.destination.clone()),
            date: Some(self.date),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            acceptable: self.trains.clone(),
            passengers: self.passengers.clone(),
            student_fare: self.student_fare,
        }
    }
}
