//! # Reservation Repository
//!
//! Tables, reservations and the conditional **claim** - the atomic step
//! the pure allocator deliberately does not provide.
//!
//! ## Closing the Double-Booking Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session A                        Session B                             │
//! │  ─────────                        ─────────                             │
//! │  available_tables() → [t4, t6]    available_tables() → [t4, t6]         │
//! │  book(…, "t4")                    book(…, "t4")                         │
//! │    create claim "d:s:t4" ✓          create claim "d:s:t4" ✗ Conflict    │
//! │    create reservation   ✓           → SlotTaken: re-run allocation,     │
//! │                                       book t6 instead                   │
//! │                                                                         │
//! │  The claim document id is deterministic (date:slot:table), so two       │
//! │  sessions racing for the same slot collide on the same key and the     │
//! │  store's create-if-absent picks exactly one winner.                     │
//! │                                                                         │
//! │  Cancel / no-show deletes the claim, releasing the slot.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::document::{collections, encode, DocumentStore, FieldFilter};
use crate::error::{StoreError, StoreResult};
use comanda_core::validation::validate_party_size;
use comanda_core::{find_available, Reservation, ReservationStatus, Table, TimeSlot};

/// Repository for tables and reservations.
#[derive(Clone)]
pub struct ReservationRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ReservationRepository { store }
    }

    /// Lists every table, including out-of-service ones.
    pub async fn tables(&self) -> StoreResult<Vec<Table>> {
        let docs = self.store.list(collections::TABLES, None).await?;
        docs.iter().map(|d| d.decode()).collect()
    }

    /// Lists all reservations on a date.
    pub async fn on_date(&self, date: NaiveDate) -> StoreResult<Vec<Reservation>> {
        let docs = self
            .store
            .list(
                collections::RESERVATIONS,
                Some(FieldFilter::new("date", date.to_string())),
            )
            .await?;
        docs.iter().map(|d| d.decode()).collect()
    }

    /// Proposes tables for a party at the given date and slot.
    ///
    /// Read-then-decide: loads a snapshot and runs the pure allocator
    /// over it. The result is a proposal; [`book`](Self::book) decides.
    pub async fn available_tables(
        &self,
        date: NaiveDate,
        time: TimeSlot,
        party_size: i64,
    ) -> StoreResult<Vec<Table>> {
        validate_party_size(party_size).map_err(comanda_core::DomainError::from)?;

        let tables = self.tables().await?;
        let reservations = self.on_date(date).await?;
        Ok(find_available(&tables, &reservations, time, party_size))
    }

    /// Books a table: wins the claim, then persists the reservation.
    ///
    /// ## Errors
    /// `SlotTaken` when another session claimed the same table slot
    /// between allocation and booking - the caller re-runs allocation
    /// against fresh data and offers the next candidate.
    pub async fn book(
        &self,
        date: NaiveDate,
        time: TimeSlot,
        table_id: &str,
        number_of_people: i64,
    ) -> StoreResult<Reservation> {
        validate_party_size(number_of_people).map_err(comanda_core::DomainError::from)?;

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            date,
            time,
            number_of_people,
            table_id: table_id.to_string(),
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        };

        // The claim is the atomic step: create-if-absent on a
        // deterministic key picks exactly one winner per table slot.
        let claim_id = claim_id(date, time, table_id);
        self.store
            .create(
                collections::TABLE_CLAIMS,
                &claim_id,
                json!({ "reservationId": reservation.id }),
            )
            .await
            .map_err(|err| match err {
                StoreError::Conflict { .. } => StoreError::SlotTaken {
                    table_id: table_id.to_string(),
                },
                other => other,
            })?;

        self.store
            .create(
                collections::RESERVATIONS,
                &reservation.id,
                encode(&reservation)?,
            )
            .await?;
        debug!(id = %reservation.id, table = table_id, slot = %time, "reservation booked");
        Ok(reservation)
    }

    /// Advances a reservation along its status graph.
    ///
    /// Cancelling or marking a no-show releases the claim, so the table
    /// becomes bookable for that slot again.
    pub async fn advance(
        &self,
        id: &str,
        target: ReservationStatus,
    ) -> StoreResult<Reservation> {
        let doc = self
            .store
            .get(collections::RESERVATIONS, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::RESERVATIONS.to_string(),
                id: id.to_string(),
            })?;

        let reservation: Reservation = doc.decode()?;
        let next = reservation.transition(target)?;

        self.store
            .update(collections::RESERVATIONS, id, doc.version, encode(&next)?)
            .await?;

        if !next.status.blocks_table() {
            let claim = claim_id(next.date, next.time, &next.table_id);
            self.store.delete(collections::TABLE_CLAIMS, &claim).await?;
            debug!(id, table = %next.table_id, "claim released");
        }
        Ok(next)
    }

    /// Seeds a table document (backoffice path).
    pub async fn upsert_table(&self, table: &Table) -> StoreResult<()> {
        self.store
            .put(collections::TABLES, &table.id, encode(table)?)
            .await?;
        Ok(())
    }
}

/// Deterministic claim key: one document per occupied table slot.
fn claim_id(date: NaiveDate, time: TimeSlot, table_id: &str) -> String {
    format!("{}:{}:{}", date, time, table_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn table(id: &str, capacity: i64) -> Table {
        Table {
            id: id.to_string(),
            capacity,
            available: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    async fn seeded_repo() -> ReservationRepository {
        let repo = ReservationRepository::new(Arc::new(MemoryStore::new()));
        repo.upsert_table(&table("t2", 2)).await.unwrap();
        repo.upsert_table(&table("t4", 4)).await.unwrap();
        repo.upsert_table(&table("t6", 6)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_available_tables_tightest_fit() {
        let repo = seeded_repo().await;
        let tables = repo
            .available_tables(date(), TimeSlot::Dinner2100, 3)
            .await
            .unwrap();
        let ids: Vec<&str> = tables.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t6"]);
    }

    #[tokio::test]
    async fn test_second_claim_on_same_slot_loses() {
        let repo = seeded_repo().await;

        repo.book(date(), TimeSlot::Dinner2100, "t4", 3).await.unwrap();

        // Another session raced us to the same table slot.
        let err = repo
            .book(date(), TimeSlot::Dinner2100, "t4", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlotTaken { table_id } if table_id == "t4"));

        // A different slot on the same table is untouched.
        repo.book(date(), TimeSlot::Dinner2200, "t4", 2).await.unwrap();
    }

    #[tokio::test]
    async fn test_booked_table_disappears_from_allocation() {
        let repo = seeded_repo().await;
        repo.book(date(), TimeSlot::Dinner2100, "t4", 3).await.unwrap();

        let tables = repo
            .available_tables(date(), TimeSlot::Dinner2100, 3)
            .await
            .unwrap();
        let ids: Vec<&str> = tables.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t6"]);
    }

    #[tokio::test]
    async fn test_cancel_releases_claim_and_allocation() {
        let repo = seeded_repo().await;
        let reservation = repo.book(date(), TimeSlot::Dinner2100, "t4", 3).await.unwrap();

        repo.advance(&reservation.id, ReservationStatus::Cancelled)
            .await
            .unwrap();

        // The slot is bookable again...
        let tables = repo
            .available_tables(date(), TimeSlot::Dinner2100, 3)
            .await
            .unwrap();
        assert!(tables.iter().any(|t| t.id == "t4"));

        // ...and a new booking wins the fresh claim.
        repo.book(date(), TimeSlot::Dinner2100, "t4", 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_seated_reservation_cannot_cancel() {
        let repo = seeded_repo().await;
        let reservation = repo.book(date(), TimeSlot::Dinner2100, "t4", 3).await.unwrap();

        repo.advance(&reservation.id, ReservationStatus::Confirmed).await.unwrap();
        repo.advance(&reservation.id, ReservationStatus::Seated).await.unwrap();

        let err = repo
            .advance(&reservation.id, ReservationStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));
    }

    #[tokio::test]
    async fn test_party_size_validated_before_booking() {
        let repo = seeded_repo().await;
        let err = repo
            .book(date(), TimeSlot::Dinner2100, "t4", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));
    }
}
