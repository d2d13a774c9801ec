//! # Validation Module
//!
//! Input validation utilities for the Comanda engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client UI                                                    │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (engine entry points)                            │
//! │  ├── Quantity / note / party-size limits                               │
//! │  └── The checks business rules rely on                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document store security rules                                │
//! │  └── Schema and ownership enforcement on the remote side               │
//! │                                                                         │
//! │  Defense in depth: the engine never trusts the screen above it         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MAX_NOTE_LENGTH, MAX_PARTY_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (99)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a non-negative amount in minor units (discounts, fees).
///
/// Zero is allowed: clearing a discount or fee sets it back to zero.
pub fn validate_amount_minor_units(field: &str, minor_units: i64) -> ValidationResult<()> {
    if minor_units < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a reservation party size.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_PARTY_SIZE (20); bigger groups go through the
///   restaurant phone line, not the app
pub fn validate_party_size(people: i64) -> ValidationResult<()> {
    if people <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "numberOfPeople".to_string(),
        });
    }

    if people > MAX_PARTY_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "numberOfPeople".to_string(),
            min: 1,
            max: MAX_PARTY_SIZE,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a free-text cart line note.
///
/// ## Rules
/// - Can be empty (most lines carry no note)
/// - Maximum MAX_NOTE_LENGTH characters
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }

    Ok(())
}

/// Validates a promotion code's shape.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 32 characters
/// - Only letters, numbers, hyphens and underscores
pub fn validate_promotion_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 32,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart width (number of distinct lines) before appending.
pub fn validate_cart_width(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount_minor_units("discount", 0).is_ok());
        assert!(validate_amount_minor_units("discount", 500).is_ok());
        assert!(validate_amount_minor_units("discount", -1).is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(20).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(21).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note("").is_ok());
        assert!(validate_note("sin cebolla").is_ok());
        assert!(validate_note(&"x".repeat(281)).is_err());
    }

    #[test]
    fn test_validate_promotion_code() {
        assert!(validate_promotion_code("SUMMER-10").is_ok());
        assert!(validate_promotion_code("welcome_2025").is_ok());

        assert!(validate_promotion_code("").is_err());
        assert!(validate_promotion_code("   ").is_err());
        assert!(validate_promotion_code("has space").is_err());
        assert!(validate_promotion_code(&"A".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_cart_width() {
        assert!(validate_cart_width(0).is_ok());
        assert!(validate_cart_width(49).is_ok());
        assert!(validate_cart_width(50).is_err());
    }
}
