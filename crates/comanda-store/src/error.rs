//! # Store Error Types
//!
//! Error types for document store round-trips.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Remote driver failure ──► StoreError::Unavailable                      │
//! │  Version/id collision  ──► StoreError::Conflict ──► SlotTaken           │
//! │  Engine rule violation ──► StoreError::Domain (DomainError)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Client app maps each category to its own user-facing message;          │
//! │  Conflict/SlotTaken mean "reload and retry", never "give up".           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use comanda_core::DomainError;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found where one was required.
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// Conditional write lost: the id already exists (create) or the
    /// version moved underneath us (update).
    ///
    /// ## When This Occurs
    /// - Two sessions claim the same table slot
    /// - Two devices update the same loyalty account concurrently
    ///
    /// The caller reloads the document and decides whether to retry.
    #[error("Conflicting write on {collection}/{id}")]
    Conflict { collection: String, id: String },

    /// The requested table slot was claimed by another session first.
    ///
    /// Raised by the reservation claim step; the caller re-runs
    /// allocation against fresh data.
    #[error("Table {table_id} was taken for that slot by another booking")]
    SlotTaken { table_id: String },

    /// A document payload did not match the expected entity shape.
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The remote store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A domain rule rejected the operation (wraps the engine error).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::NotFound {
            collection: "orders".to_string(),
            id: "o-1".to_string(),
        };
        assert_eq!(err.to_string(), "orders/o-1 not found");

        let err = StoreError::SlotTaken {
            table_id: "t-4".to_string(),
        };
        assert!(err.to_string().contains("t-4"));
    }

    #[test]
    fn test_domain_error_passes_through() {
        let err: StoreError = DomainError::EmptyCart.into();
        assert_eq!(err.to_string(), DomainError::EmptyCart.to_string());
    }
}
