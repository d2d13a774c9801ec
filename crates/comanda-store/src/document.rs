//! # Document Store Capability
//!
//! The seam between this workspace and the remote document database.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Documents are keyed by (collection, id) and carry a version number     │
//! │  the store bumps on every write.                                        │
//! │                                                                         │
//! │  Two conditional primitives carry all the concurrency weight:           │
//! │                                                                         │
//! │    create(..)              fails with Conflict when the id exists       │
//! │                            → the reservation claim builds on this       │
//! │                                                                         │
//! │    update(.., expected)    fails with Conflict when the stored          │
//! │                            version != expected                          │
//! │                            → loyalty accounts, promotions, orders       │
//! │                                                                         │
//! │  A remote driver that cannot honor these two MUST NOT implement         │
//! │  this trait.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::StoreResult;

// =============================================================================
// Collections
// =============================================================================

/// Collection names, exactly as they exist in the remote store.
pub mod collections {
    pub const MENU_ITEMS: &str = "menuItems";
    pub const CATEGORIES: &str = "categories";
    pub const ORDERS: &str = "orders";
    pub const RESERVATIONS: &str = "reservations";
    pub const TABLES: &str = "tables";
    pub const LOYALTY_POINTS: &str = "loyaltyPoints";
    pub const PROMOTIONS: &str = "promotions";
    pub const USERS: &str = "users";

    /// Claim documents backing the atomic reservation claim; keyed
    /// `date:slot:table`, one per occupied table slot.
    pub const TABLE_CLAIMS: &str = "tableClaims";

    /// Persisted carts, keyed by session id.
    pub const CARTS: &str = "carts";
}

// =============================================================================
// Document
// =============================================================================

/// A stored document: id, payload and the version used for conditional
/// writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Monotonic per-document version, bumped by the store on every write.
    pub version: u64,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Deserializes the payload into an entity.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Serializes an entity into a document payload.
pub fn encode<T: Serialize>(entity: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

// =============================================================================
// Filter & Events
// =============================================================================

/// Equality filter on one top-level payload field - the only query shape
/// the engine needs from the store.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub equals: Value,
}

impl FieldFilter {
    pub fn new(field: &str, equals: impl Into<Value>) -> Self {
        FieldFilter {
            field: field.to_string(),
            equals: equals.into(),
        }
    }

    /// Whether a payload matches this filter.
    pub fn matches(&self, data: &Value) -> bool {
        data.get(&self.field) == Some(&self.equals)
    }
}

/// What happened to a document, as delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEventKind {
    Created,
    Updated,
    Deleted,
}

/// A change notification from a subscription.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub collection: String,
    pub id: String,
    pub kind: StoreEventKind,
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// Capability trait over the remote document database.
///
/// Implementations perform the actual I/O; everything above this trait is
/// mapping. [`crate::MemoryStore`] implements it for tests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document, `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Lists a collection, optionally filtered by field equality.
    async fn list(&self, collection: &str, filter: Option<FieldFilter>)
        -> StoreResult<Vec<Document>>;

    /// Creates a document, failing with `Conflict` when the id exists.
    ///
    /// This create-if-absent semantics is the primitive the reservation
    /// claim is built on.
    async fn create(&self, collection: &str, id: &str, data: Value) -> StoreResult<Document>;

    /// Writes a document unconditionally (upsert).
    async fn put(&self, collection: &str, id: &str, data: Value) -> StoreResult<Document>;

    /// Updates a document only when its stored version equals
    /// `expected_version`; fails with `Conflict` otherwise.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> StoreResult<Document>;

    /// Deletes a document. Absent ids are a no-op.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Subscribes to change notifications for one collection.
    async fn subscribe(&self, collection: &str) -> StoreResult<broadcast::Receiver<StoreEvent>>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_filter_matches_top_level_field() {
        let filter = FieldFilter::new("status", "pending");

        assert!(filter.matches(&json!({"status": "pending", "total": 10})));
        assert!(!filter.matches(&json!({"status": "ready"})));
        assert!(!filter.matches(&json!({"other": "pending"})));
    }

    #[test]
    fn test_document_decode_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Probe {
            name: String,
            n: i64,
        }

        let entity = Probe {
            name: "x".to_string(),
            n: 7,
        };
        let doc = Document {
            id: "p-1".to_string(),
            version: 1,
            data: encode(&entity).unwrap(),
            updated_at: Utc::now(),
        };

        assert_eq!(doc.decode::<Probe>().unwrap(), entity);
    }
}
