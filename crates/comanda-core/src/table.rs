//! # Table Allocation
//!
//! Finds a non-conflicting table for a requested date, slot and party
//! size, and validates reservation status transitions.
//!
//! ## Read-Then-Decide
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Caller loads tables + that day's reservations from the store        │
//! │  2. find_available() proposes candidate tables (pure filter + sort)     │
//! │  3. Caller CLAIMS one table through a conditional store write           │
//! │                                                                         │
//! │  Step 3 is where two concurrent sessions are told apart: the engine     │
//! │  only proposes, it cannot claim. See the reservations adapter in        │
//! │  comanda-store for the conditional claim.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{DomainError, DomainResult};
use crate::types::{ReservationStatus, TimeSlot};

// =============================================================================
// Table
// =============================================================================

/// A physical table in the dining room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// Seats at the table.
    pub capacity: i64,
    /// Maintenance flag: an unavailable table is out of service,
    /// independent of whether anything is booked on it.
    pub available: bool,
}

// =============================================================================
// Reservation
// =============================================================================

/// A table reservation for a fixed service slot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub number_of_people: i64,
    pub table_id: String,
    pub status: ReservationStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Applies a status transition, returning the updated reservation.
    ///
    /// `pending → confirmed → seated → completed`; `cancelled` and
    /// `no-show` are reachable from `pending`/`confirmed` only (once the
    /// party is seated there is nothing left to cancel). Everything else
    /// fails with `IllegalTransition`.
    pub fn transition(&self, target: ReservationStatus) -> DomainResult<Reservation> {
        use ReservationStatus::*;

        let legal = matches!(
            (self.status, target),
            (Pending, Confirmed)
                | (Confirmed, Seated)
                | (Seated, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Pending, NoShow)
                | (Confirmed, NoShow)
        );
        if !legal {
            return Err(DomainError::IllegalTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }

        let mut next = self.clone();
        next.status = target;
        Ok(next)
    }
}

// =============================================================================
// Allocation
// =============================================================================

/// Proposes tables for a party at the given slot.
///
/// Filters to tables with `capacity >= party_size` that are in service,
/// drops any table already holding a reservation at that slot whose
/// status still blocks it (anything but cancelled/no-show), and returns
/// the rest ordered tightest fit first - ascending capacity, ties broken
/// by table id so the result is deterministic.
///
/// An empty result is not an error; the caller decides how to present
/// "no tables available". The returned tables are proposals only: the
/// caller must still win the conditional claim against the store.
pub fn find_available(
    tables: &[Table],
    reservations_on_date: &[Reservation],
    time: TimeSlot,
    party_size: i64,
) -> Vec<Table> {
    let mut candidates: Vec<Table> = tables
        .iter()
        .filter(|t| t.available && t.capacity >= party_size)
        .filter(|t| {
            !reservations_on_date
                .iter()
                .any(|r| r.table_id == t.id && r.time == time && r.status.blocks_table())
        })
        .cloned()
        .collect();

    candidates.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));
    candidates
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: &str, capacity: i64) -> Table {
        Table {
            id: id.to_string(),
            capacity,
            available: true,
        }
    }

    fn reservation(table_id: &str, time: TimeSlot, status: ReservationStatus) -> Reservation {
        Reservation {
            id: format!("res-{}", table_id),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            time,
            number_of_people: 2,
            table_id: table_id.to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tightest_fit_first() {
        let tables = vec![table("t6", 6), table("t2", 2), table("t4", 4)];

        let found = find_available(&tables, &[], TimeSlot::Dinner2100, 3);

        // Party of 3: the 4-top is preferred over the 6-top, the 2-top
        // doesn't fit at all.
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t6"]);
    }

    #[test]
    fn test_capacity_ties_break_by_id() {
        let tables = vec![table("b", 4), table("a", 4)];
        let found = find_available(&tables, &[], TimeSlot::Lunch1300, 2);
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_booked_table_is_never_proposed() {
        let tables = vec![table("t4", 4), table("t6", 6)];
        let reservations = vec![reservation(
            "t4",
            TimeSlot::Dinner2100,
            ReservationStatus::Confirmed,
        )];

        let found = find_available(&tables, &reservations, TimeSlot::Dinner2100, 3);
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t6"]);
    }

    #[test]
    fn test_other_slots_do_not_block() {
        let tables = vec![table("t4", 4)];
        let reservations = vec![reservation(
            "t4",
            TimeSlot::Dinner2000,
            ReservationStatus::Confirmed,
        )];

        let found = find_available(&tables, &reservations, TimeSlot::Dinner2100, 3);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_cancelled_and_no_show_release_the_table() {
        let tables = vec![table("t4", 4)];

        for status in [ReservationStatus::Cancelled, ReservationStatus::NoShow] {
            let reservations = vec![reservation("t4", TimeSlot::Dinner2100, status)];
            let found = find_available(&tables, &reservations, TimeSlot::Dinner2100, 3);
            assert_eq!(found.len(), 1, "{status} should release the table");
        }
    }

    #[test]
    fn test_out_of_service_table_is_skipped() {
        let mut broken = table("t4", 4);
        broken.available = false;

        let found = find_available(&[broken], &[], TimeSlot::Dinner2100, 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_no_fit_returns_empty_not_error() {
        let tables = vec![table("t2", 2)];
        let found = find_available(&tables, &[], TimeSlot::Dinner2100, 8);
        assert!(found.is_empty());
    }

    #[test]
    fn test_reservation_forward_path() {
        let res = reservation("t4", TimeSlot::Dinner2100, ReservationStatus::Pending);
        let res = res.transition(ReservationStatus::Confirmed).unwrap();
        let res = res.transition(ReservationStatus::Seated).unwrap();
        let res = res.transition(ReservationStatus::Completed).unwrap();
        assert_eq!(res.status, ReservationStatus::Completed);
    }

    #[test]
    fn test_reservation_illegal_edges() {
        // Seated parties can no longer cancel or no-show.
        let seated = reservation("t4", TimeSlot::Dinner2100, ReservationStatus::Seated);
        assert!(seated.transition(ReservationStatus::Cancelled).is_err());
        assert!(seated.transition(ReservationStatus::NoShow).is_err());

        // Terminal statuses stay terminal.
        let done = reservation("t4", TimeSlot::Dinner2100, ReservationStatus::Completed);
        assert!(done.transition(ReservationStatus::Pending).is_err());
        let cancelled = reservation("t4", TimeSlot::Dinner2100, ReservationStatus::Cancelled);
        assert!(cancelled.transition(ReservationStatus::Confirmed).is_err());

        // Pending can cancel or no-show.
        let pending = reservation("t4", TimeSlot::Dinner2100, ReservationStatus::Pending);
        assert!(pending.transition(ReservationStatus::Cancelled).is_ok());
        assert!(pending.transition(ReservationStatus::NoShow).is_ok());
    }
}
