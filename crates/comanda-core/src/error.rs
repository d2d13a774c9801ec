//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                       │
//! │  ├── DomainError      - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  comanda-store errors (separate crate)                                 │
//! │  └── StoreError       - Document store round-trip failures             │
//! │                                                                         │
//! │  Flow: ValidationError → DomainError → StoreError → client app         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every kind below is locally recoverable: callers surface a message and
//! may retry with corrected input. Store/network unavailability is the
//! adapter's concern and is never folded into these kinds.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, amounts, statuses)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::{Currency, Money};

// =============================================================================
// Domain Error
// =============================================================================

/// Business rule violations raised by the engine.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cart operation was given a non-positive quantity.
    #[error("Quantity must be greater than zero, got {requested}")]
    InvalidQuantity { requested: i64 },

    /// Checkout was attempted on a cart with no lines.
    #[error("Cannot create an order from an empty cart")]
    EmptyCart,

    /// The delivery type requires a detail that was not supplied.
    ///
    /// ## When This Occurs
    /// - `delivery` order without a delivery address
    /// - `dine-in` order without a table
    #[error("Missing {missing} for this order type")]
    MissingDeliveryDetails { missing: &'static str },

    /// A status change was requested outside the forward-only graph.
    ///
    /// ## When This Occurs
    /// - Moving an order backwards (`ready` → `pending`)
    /// - Leaving a terminal status (`completed`, `cancelled`)
    /// - Cancelling a reservation that is already seated
    #[error("Illegal transition from '{from}' to '{to}'")]
    IllegalTransition { from: String, to: String },

    /// A redemption asked for more points than the account holds.
    #[error("Insufficient points: available {available}, requested {requested}")]
    InsufficientPoints { available: i64, requested: i64 },

    /// The promotion code is unknown or no longer active.
    #[error("Promotion code '{0}' not found")]
    PromotionNotFound(String),

    /// The promotion is outside its validity window.
    #[error("Promotion code '{0}' has expired")]
    PromotionExpired(String),

    /// The promotion has reached its usage limit.
    #[error("Promotion code '{0}' has been fully redeemed")]
    PromotionExhausted(String),

    /// The order subtotal is below the promotion's minimum.
    #[error("Order does not reach the {minimum} minimum for this promotion")]
    MinimumNotMet { minimum: Money },

    /// Two monetary values of different currencies were combined.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements and are checked
/// before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed id, bad promotion code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::InsufficientPoints {
            available: 120,
            requested: 500,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient points: available 120, requested 500"
        );

        let err = DomainError::IllegalTransition {
            from: "ready".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal transition from 'ready' to 'pending'");
    }

    #[test]
    fn test_currency_mismatch_message() {
        let err = DomainError::CurrencyMismatch {
            left: Currency::Eur,
            right: Currency::Usd,
        };
        assert_eq!(err.to_string(), "Currency mismatch: EUR vs USD");
    }

    #[test]
    fn test_validation_converts_to_domain_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let domain_err: DomainError = validation_err.into();
        assert!(matches!(domain_err, DomainError::Validation(_)));
    }
}
