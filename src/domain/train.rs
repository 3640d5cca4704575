use serde::{Deserialize, Serialize};

/// Which remaining-count field of an [`AvailabilityRow`] a seat class reads.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SeatClassKey {
    /// Hard seat (硬座).
    Yz,
    /// No seat / standing room (无座).
    Wz,
    /// Hard sleeper (硬卧).
    Yw,
    /// Soft sleeper (软卧).
    Rw,
    /// Second class (二等座).
    Ze,
    /// First class (一等座).
    Zy,
}

/// A seat class the caller is willing to purchase.
///
/// `code` is the wire class code placed verbatim into the passenger
/// manifest (§ passenger encoding); `key` selects the availability field.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct SeatClass {
    pub code: String,
    pub key: SeatClassKey,
}

/// A train the caller is willing to purchase on, matched against
/// availability rows by name.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct TrainDescriptor {
    pub name: String,
}

/// One (train, seat) combination in the caller's ranked preference order.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct AcceptablePair {
    pub train: TrainDescriptor,
    pub seat: SeatClass,
}

/// One row of an availability response.
///
/// Count fields are strings as the service sends them: a number, the
/// availability marker, or empty meaning unavailable/inapplicable.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Default)]
pub struct AvailabilityRow {
    pub name: String,
    /// Human-readable status label, used only for logging.
    #[serde(default)]
    pub button: String,
    #[serde(default)]
    pub yz: String,
    #[serde(default)]
    pub wz: String,
    #[serde(default)]
    pub yw: String,
    #[serde(default)]
    pub rw: String,
    #[serde(default)]
    pub ze: String,
    #[serde(default)]
    pub zy: String,
}

impl AvailabilityRow {
    /// The remaining-count field for a seat class.
    pub fn remaining(&self, key: SeatClassKey) -> &str {
        match key {
            SeatClassKey::Yz => &self.yz,
            SeatClassKey::Wz => &self.wz,
            SeatClassKey::Yw => &self.yw,
            SeatClassKey::Rw => &self.rw,
            SeatClassKey::Ze => &self.ze,
            SeatClassKey::Zy => &self.zy,
        }
    }
}

/// Non-numeric marker the service uses for "seats available".
pub const AVAILABLE_MARKER: &str = "有";

/// Whether a remaining-count field value means a purchasable seat.
///
/// Empty means unavailable; the locale-specific marker means available;
/// otherwise the value must parse as a positive integer. Note `"0"` does
/// not match.
pub fn seat_available(count: &str) -> bool {
    if count.is_empty() {
        return false;
    }
    count == AVAILABLE_MARKER || count.parse::<u32>().is_ok_and(|n| n > 0)
}
