use crate::domain::train::SeatClass;
use serde::{Deserialize, Serialize};

/// One traveller on the draft order. Immutable once supplied.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Passenger {
    /// Passenger type code ("1" adult, "3" student, ...).
    pub passenger_type: String,
    pub name: String,
    /// National ID string, passed through verbatim.
    pub id_no: String,
}

/// The two delimiter-encoded passenger representations the booking
/// protocol expects. The service parses them positionally, so these are a
/// bit-exact contract.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct PassengerStrings {
    /// Submission manifest: `seatCode,0,typeCode,name,1,idNo,,N` per
    /// passenger, records joined by `_`, no trailing separator.
    pub manifest: String,
    /// Passenger registry: `name,1,idNo,typeCode` per passenger, records
    /// joined by `_`, with a trailing `_` after the last record.
    pub registry: String,
}

/// Encodes the selected seat class and passenger list into the two wire
/// strings. Passenger order is preserved; the service correlates the two
/// strings by position.
///
/// The `0`, `1`, empty phone field and `N` flag are fixed protocol
/// constants.
pub fn encode_passengers(seat: &SeatClass, passengers: &[Passenger]) -> PassengerStrings {
    let mut manifest = Vec::with_capacity(passengers.len());
    let mut registry = Vec::with_capacity(passengers.len());
    for p in passengers {
        manifest.push(
            [
                seat.code.as_str(),
                "0",
                &p.passenger_type,
                &p.name,
                "1",
                &p.id_no,
                "",
                "N",
            ]
            .join(","),
        );
        registry.push([p.name.as_str(), "1", &p.id_no, &p.passenger_type].join(","));
    }
    PassengerStrings {
        manifest: manifest.join("_"),
        registry: registry.join("_") + "_",
    }
}
