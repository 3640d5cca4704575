use crate::domain::ports::{AvailabilityQuery, BookingClient};
use crate::domain::train::{AcceptablePair, AvailabilityRow, SeatClass, seat_available};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

/// A purchasable (train row, seat class) combination found by a poll.
#[derive(Debug, Clone)]
pub struct TrainMatch {
    pub train: AvailabilityRow,
    pub seat: SeatClass,
}

/// Issues one availability query and scans the result against the ranked
/// acceptable pairs.
///
/// A failed query is logged and reported as "no match" so the loop tries
/// again next tick; it never escalates to a fatal error.
pub async fn poll_once(
    client: &dyn BookingClient,
    query: AvailabilityQuery,
    acceptable: &[AcceptablePair],
    date: NaiveDate,
) -> Option<TrainMatch> {
    let rows = match client.query_availability(query).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "query fail");
            return None;
        }
    };
    select_match(&rows, acceptable, date)
}

/// Scans rows for the first acceptable pair with a purchasable seat.
///
/// The caller's ranked order is the tie-break: the first pair in
/// `acceptable` with an available seat wins, regardless of row order.
/// As a side effect, every row matching an acceptable train by name has
/// its per-class counts logged once on first encounter.
fn select_match(
    rows: &[AvailabilityRow],
    acceptable: &[AcceptablePair],
    date: NaiveDate,
) -> Option<TrainMatch> {
    let mut logged: HashSet<&str> = HashSet::new();
    for row in rows {
        if acceptable.iter().any(|pair| pair.train.name == row.name)
            && logged.insert(row.name.as_str())
        {
            info!("{} {}: {}", date.format("%m-%d"), row.name, row.button);
            info!(
                "硬座: {} 无座: {} 硬卧: {} 软卧: {} 二等座: {} 一等座: {}",
                row.yz, row.wz, row.yw, row.rw, row.ze, row.zy
            );
        }
    }

    for pair in acceptable {
        if let Some(row) = rows.iter().find(|row| row.name == pair.train.name)
            && seat_available(row.remaining(pair.seat.key))
        {
            return Some(TrainMatch {
                train: row.clone(),
                seat: pair.seat.clone(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::train::{SeatClassKey, TrainDescriptor};

    fn pair(train: &str, code: &str, key: SeatClassKey) -> AcceptablePair {
        AcceptablePair {
            train: TrainDescriptor { name: train.into() },
            seat: SeatClass {
                code: code.into(),
                key,
            },
        }
    }

    fn row(name: &str, ze: &str, zy: &str) -> AvailabilityRow {
        AvailabilityRow {
            name: name.into(),
            ze: ze.into(),
            zy: zy.into(),
            ..Default::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn test_first_ranked_pair_wins_over_row_order() {
        let acceptable = vec![
            pair("G1", "O", SeatClassKey::Ze),
            pair("G3", "O", SeatClassKey::Ze),
        ];
        // G3 arrives first in the response, both have seats.
        let rows = vec![row("G3", "有", ""), row("G1", "5", "")];

        let found = select_match(&rows, &acceptable, date()).unwrap();
        assert_eq!(found.train.name, "G1");
    }

    #[test]
    fn test_lower_ranked_pair_matches_when_first_has_no_row() {
        let acceptable = vec![
            pair("G1", "O", SeatClassKey::Ze),
            pair("G3", "O", SeatClassKey::Ze),
        ];
        let rows = vec![row("G3", "有", "")];

        let found = select_match(&rows, &acceptable, date()).unwrap();
        assert_eq!(found.train.name, "G3");
        assert_eq!(found.seat.key, SeatClassKey::Ze);
    }

    #[test]
    fn test_sold_out_seat_is_skipped() {
        let acceptable = vec![
            pair("G1", "O", SeatClassKey::Ze),
            pair("G1", "M", SeatClassKey::Zy),
        ];
        // Second class sold out, first class has two seats left.
        let rows = vec![row("G1", "0", "2")];

        let found = select_match(&rows, &acceptable, date()).unwrap();
        assert_eq!(found.seat.code, "M");
    }

    #[test]
    fn test_no_match_when_nothing_available() {
        let acceptable = vec![pair("G1", "O", SeatClassKey::Ze)];
        let rows = vec![row("G1", "", ""), row("G7", "有", "")];

        assert!(select_match(&rows, &acceptable, date()).is_none());
    }
}
