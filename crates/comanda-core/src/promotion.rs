//! # Promotion Validator
//!
//! Validates a promotion code against its time window, usage limit and
//! minimum order amount, and computes the benefit it grants.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lookup result ──► not found? (unknown or inactive)                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  usage limit ──► exhausted? (checked BEFORE the window: a fully         │
//! │        │         redeemed code reports exhausted even when expired)     │
//! │        ▼                                                                │
//! │  time window ──► expired?                                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  minimum amount ──► not met?                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  benefit: Discount(Money) | SecondUnitFree | FreeItem { itemId }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validator works on the promotion snapshot it is handed;
//! incrementing `usageCount` is shared-state work that belongs to the
//! promotions store adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{DomainError, DomainResult, ValidationError};
use crate::money::Money;
use crate::types::Rate;
use crate::validation;

// =============================================================================
// Promotion
// =============================================================================

/// The kind of benefit a promotion grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionType {
    /// A percentage off the subtotal.
    Percentage,
    /// A fixed amount off the subtotal.
    Fixed,
    /// Buy one, get the second of the same line free.
    Bogo,
    /// A specific item added free of charge.
    FreeItem,
}

/// A promotion as read from the `promotions` collection.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// The code diners type in; also the document id.
    pub code: String,
    pub discount_type: PromotionType,
    /// Basis points for `percentage`, minor units for `fixed`,
    /// unused for `bogo`/`free-item`.
    pub discount_value: i64,
    /// Ceiling for percentage discounts.
    pub max_discount: Option<Money>,
    /// The granted item for `free-item` promotions.
    pub free_item_id: Option<String>,
    pub min_order_amount: Option<Money>,
    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub ends_at: DateTime<Utc>,
    /// `None` means unlimited redemptions.
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub active: bool,
}

impl Promotion {
    /// Whether the usage limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .map(|limit| self.usage_count >= limit)
            .unwrap_or(false)
    }
}

// =============================================================================
// Benefit
// =============================================================================

/// What a validated promotion grants.
///
/// `bogo`/`free-item` hand back a line reference for the caller to
/// resolve against the cart (which duplicate line, which item document)
/// rather than a raw amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PromotionBenefit {
    /// Apply this amount as the cart discount.
    Discount { amount: Money },
    /// The cheapest duplicate line gets one unit free.
    SecondUnitFree,
    /// Add this catalog item free of charge.
    FreeItem { item_id: String },
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a promotion lookup against the order subtotal at `now`.
///
/// `lookup` is the result of the caller's code lookup: `None` (or an
/// inactive promotion) reports `PromotionNotFound` - the diner sees one
/// message for "never existed" and "switched off".
pub fn validate(
    lookup: Option<&Promotion>,
    code: &str,
    order_subtotal: Money,
    now: DateTime<Utc>,
) -> DomainResult<PromotionBenefit> {
    validation::validate_promotion_code(code)?;

    let promotion = match lookup {
        Some(p) if p.active => p,
        _ => return Err(DomainError::PromotionNotFound(code.to_string())),
    };

    if promotion.is_exhausted() {
        return Err(DomainError::PromotionExhausted(promotion.code.clone()));
    }

    if now < promotion.starts_at || now > promotion.ends_at {
        return Err(DomainError::PromotionExpired(promotion.code.clone()));
    }

    if let Some(minimum) = promotion.min_order_amount {
        if minimum.currency() != order_subtotal.currency() {
            return Err(DomainError::CurrencyMismatch {
                left: minimum.currency(),
                right: order_subtotal.currency(),
            });
        }
        if order_subtotal.minor_units() < minimum.minor_units() {
            return Err(DomainError::MinimumNotMet { minimum });
        }
    }

    match promotion.discount_type {
        PromotionType::Percentage => {
            let mut amount = order_subtotal.percentage(Rate::from_bps(promotion.discount_value as u32));
            if let Some(ceiling) = promotion.max_discount {
                amount = amount.cap_at(ceiling)?;
            }
            Ok(PromotionBenefit::Discount { amount })
        }
        PromotionType::Fixed => {
            let amount = Money::new(promotion.discount_value, order_subtotal.currency())
                .cap_at(order_subtotal)?;
            Ok(PromotionBenefit::Discount { amount })
        }
        PromotionType::Bogo => Ok(PromotionBenefit::SecondUnitFree),
        PromotionType::FreeItem => {
            let item_id = promotion
                .free_item_id
                .clone()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ValidationError::Required {
                    field: "freeItemId".to_string(),
                })?;
            Ok(PromotionBenefit::FreeItem { item_id })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn promotion(discount_type: PromotionType, discount_value: i64) -> Promotion {
        Promotion {
            code: "SUMMER-10".to_string(),
            discount_type,
            discount_value,
            max_discount: None,
            free_item_id: None,
            min_order_amount: None,
            starts_at: at(2025, 6, 1),
            ends_at: at(2025, 8, 31),
            usage_limit: Some(100),
            usage_count: 0,
            active: true,
        }
    }

    fn eur(minor_units: i64) -> Money {
        Money::new(minor_units, Currency::Eur)
    }

    #[test]
    fn test_unknown_code_not_found() {
        let err = validate(None, "NOPE", eur(2000), at(2025, 7, 1)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionNotFound(code) if code == "NOPE"));
    }

    #[test]
    fn test_inactive_code_reports_not_found() {
        let mut promo = promotion(PromotionType::Percentage, 1000);
        promo.active = false;

        let err = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionNotFound(_)));
    }

    #[test]
    fn test_exhausted_wins_regardless_of_dates() {
        let mut promo = promotion(PromotionType::Percentage, 1000);
        promo.usage_limit = Some(50);
        promo.usage_count = 50;

        // Inside the window...
        let err = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionExhausted(_)));

        // ...and outside it, exhausted still wins.
        let err = validate(Some(&promo), &promo.code, eur(2000), at(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionExhausted(_)));
    }

    #[test]
    fn test_expired_outside_window() {
        let promo = promotion(PromotionType::Percentage, 1000);

        let err = validate(Some(&promo), &promo.code, eur(2000), at(2025, 5, 1)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionExpired(_)));

        let err = validate(Some(&promo), &promo.code, eur(2000), at(2025, 9, 15)).unwrap_err();
        assert!(matches!(err, DomainError::PromotionExpired(_)));
    }

    #[test]
    fn test_minimum_not_met() {
        let mut promo = promotion(PromotionType::Percentage, 1000);
        promo.min_order_amount = Some(eur(1500));

        let err = validate(Some(&promo), &promo.code, eur(1499), at(2025, 7, 1)).unwrap_err();
        assert!(matches!(err, DomainError::MinimumNotMet { .. }));

        // Exactly at the minimum is fine.
        assert!(validate(Some(&promo), &promo.code, eur(1500), at(2025, 7, 1)).is_ok());
    }

    #[test]
    fn test_percentage_discount_with_ceiling() {
        let mut promo = promotion(PromotionType::Percentage, 1000); // 10%
        promo.max_discount = Some(eur(150));

        // 10% of 10.00 = 1.00, under the ceiling.
        let benefit = validate(Some(&promo), &promo.code, eur(1000), at(2025, 7, 1)).unwrap();
        assert_eq!(benefit, PromotionBenefit::Discount { amount: eur(100) });

        // 10% of 50.00 = 5.00, clamped to 1.50.
        let benefit = validate(Some(&promo), &promo.code, eur(5000), at(2025, 7, 1)).unwrap();
        assert_eq!(benefit, PromotionBenefit::Discount { amount: eur(150) });
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let promo = promotion(PromotionType::Fixed, 500); // 5.00 off

        let benefit = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap();
        assert_eq!(benefit, PromotionBenefit::Discount { amount: eur(500) });

        // Subtotal below the discount: capped, the order never goes negative.
        let benefit = validate(Some(&promo), &promo.code, eur(300), at(2025, 7, 1)).unwrap();
        assert_eq!(benefit, PromotionBenefit::Discount { amount: eur(300) });
    }

    #[test]
    fn test_bogo_returns_line_reference() {
        let promo = promotion(PromotionType::Bogo, 0);
        let benefit = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap();
        assert_eq!(benefit, PromotionBenefit::SecondUnitFree);
    }

    #[test]
    fn test_free_item_returns_item_reference() {
        let mut promo = promotion(PromotionType::FreeItem, 0);
        promo.free_item_id = Some("flan".to_string());

        let benefit = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap();
        assert_eq!(
            benefit,
            PromotionBenefit::FreeItem {
                item_id: "flan".to_string()
            }
        );
    }

    #[test]
    fn test_free_item_without_item_is_invalid() {
        let promo = promotion(PromotionType::FreeItem, 0);
        let err = validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_unlimited_usage_never_exhausts() {
        let mut promo = promotion(PromotionType::Percentage, 1000);
        promo.usage_limit = None;
        promo.usage_count = 10_000;

        assert!(validate(Some(&promo), &promo.code, eur(2000), at(2025, 7, 1)).is_ok());
    }
}
