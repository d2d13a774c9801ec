//! # Loyalty Ledger
//!
//! Append-only points ledger per account with tier progression.
//!
//! ## Ledger Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transactions: [earned +31] [earned +12] [redeemed -20] [expired -5]    │
//! │                                                                         │
//! │  points         = Σ earned − Σ redeemed − Σ expired   (never < 0)       │
//! │  lifetimePoints = Σ earned                            (never decreases) │
//! │  tier           = tier_for(lifetimePoints)            (pure function)   │
//! │                                                                         │
//! │  The log is the source of truth: balance, lifetime and tier are         │
//! │  replayed from it after every mutation and after every load from        │
//! │  the store. Stored rollups are never trusted.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Earning is idempotent per order: [`LoyaltyAccount::idempotent_record`]
//! takes the order id as the transaction id, so a retried award finds the
//! existing transaction and appends nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, ValidationError};

// =============================================================================
// Tier
// =============================================================================

/// Loyalty tier, derived solely from lifetime earned points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Lifetime points needed to reach silver.
pub const SILVER_THRESHOLD: i64 = 500;
/// Lifetime points needed to reach gold.
pub const GOLD_THRESHOLD: i64 = 1500;
/// Lifetime points needed to reach platinum.
pub const PLATINUM_THRESHOLD: i64 = 3000;

/// Maps lifetime points to a tier.
///
/// Monotone step function, boundary-inclusive upward:
/// 499 → bronze, 500 → silver, 1499 → silver, 1500 → gold, 3000 → platinum.
pub const fn tier_for(lifetime_points: i64) -> Tier {
    if lifetime_points >= PLATINUM_THRESHOLD {
        Tier::Platinum
    } else if lifetime_points >= GOLD_THRESHOLD {
        Tier::Gold
    } else if lifetime_points >= SILVER_THRESHOLD {
        Tier::Silver
    } else {
        Tier::Bronze
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// The kind of a ledger entry. The sign of the balance change is implied
/// by the kind; `points` itself is always a positive magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTransactionKind {
    /// Points granted (order award, campaign). Counts towards lifetime.
    Earned,
    /// Points spent by the customer.
    Redeemed,
    /// Points removed by an expiry sweep.
    Expired,
}

/// One entry in an account's ledger.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTransaction {
    /// Transaction id; for order awards this is the order id, which is
    /// what makes the award idempotent.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LoyaltyTransactionKind,
    /// Positive magnitude; the kind carries the sign.
    pub points: i64,
    pub reason: String,
    pub order_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Account
// =============================================================================

/// A loyalty account: the ledger plus its replayed rollups.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAccount {
    pub account_id: String,
    /// Redeemable balance, replayed from the log. Never negative.
    pub points: i64,
    /// Total ever earned, replayed from the log. Never decreases.
    pub lifetime_points: i64,
    /// Derived from `lifetime_points`, never stored independently.
    pub tier: Tier,
    pub transactions: Vec<LoyaltyTransaction>,
}

impl LoyaltyAccount {
    /// Creates an empty account at bronze.
    pub fn new(account_id: &str) -> Self {
        LoyaltyAccount {
            account_id: account_id.to_string(),
            points: 0,
            lifetime_points: 0,
            tier: Tier::Bronze,
            transactions: Vec::new(),
        }
    }

    /// Appends a transaction and replays the rollups.
    ///
    /// ## Errors
    /// - `InsufficientPoints` when redeeming (or expiring) more than the
    ///   current balance - the balance must never go negative. The account
    ///   is left untouched on error.
    /// - Validation error when `points` is not positive.
    pub fn record(
        &mut self,
        kind: LoyaltyTransactionKind,
        points: i64,
        reason: &str,
        order_id: Option<String>,
    ) -> DomainResult<()> {
        self.record_with_id(&Uuid::new_v4().to_string(), kind, points, reason, order_id)
    }

    /// Same as [`record`](Self::record), but a no-op when a transaction
    /// with `key` already exists. The key becomes the transaction id.
    ///
    /// Returns whether a transaction was appended.
    pub fn idempotent_record(
        &mut self,
        key: &str,
        kind: LoyaltyTransactionKind,
        points: i64,
        reason: &str,
        order_id: Option<String>,
    ) -> DomainResult<bool> {
        if self.transactions.iter().any(|t| t.id == key) {
            return Ok(false);
        }
        self.record_with_id(key, kind, points, reason, order_id)?;
        Ok(true)
    }

    fn record_with_id(
        &mut self,
        id: &str,
        kind: LoyaltyTransactionKind,
        points: i64,
        reason: &str,
        order_id: Option<String>,
    ) -> DomainResult<()> {
        if points <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "points".to_string(),
            }
            .into());
        }

        if kind != LoyaltyTransactionKind::Earned && points > self.points {
            return Err(DomainError::InsufficientPoints {
                available: self.points,
                requested: points,
            });
        }

        self.transactions.push(LoyaltyTransaction {
            id: id.to_string(),
            kind,
            points,
            reason: reason.to_string(),
            order_id,
            created_at: Utc::now(),
        });
        self.rebuild();
        Ok(())
    }

    /// Replays `points`, `lifetime_points` and `tier` from the log.
    ///
    /// Runs after every mutation, and must also run after deserializing
    /// an account from the store - stored rollups are never trusted.
    pub fn rebuild(&mut self) {
        let mut earned = 0;
        let mut spent = 0;
        for tx in &self.transactions {
            match tx.kind {
                LoyaltyTransactionKind::Earned => earned += tx.points,
                LoyaltyTransactionKind::Redeemed | LoyaltyTransactionKind::Expired => {
                    spent += tx.points
                }
            }
        }
        self.points = earned - spent;
        self.lifetime_points = earned;
        self.tier = tier_for(self.lifetime_points);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for(0), Tier::Bronze);
        assert_eq!(tier_for(499), Tier::Bronze);
        assert_eq!(tier_for(500), Tier::Silver);
        assert_eq!(tier_for(1499), Tier::Silver);
        assert_eq!(tier_for(1500), Tier::Gold);
        assert_eq!(tier_for(2999), Tier::Gold);
        assert_eq!(tier_for(3000), Tier::Platinum);
    }

    #[test]
    fn test_earn_updates_balance_lifetime_and_tier() {
        let mut account = LoyaltyAccount::new("acc-1");
        account
            .record(LoyaltyTransactionKind::Earned, 600, "promo", None)
            .unwrap();

        assert_eq!(account.points, 600);
        assert_eq!(account.lifetime_points, 600);
        assert_eq!(account.tier, Tier::Silver);
    }

    #[test]
    fn test_redeeming_does_not_touch_lifetime_or_tier() {
        let mut account = LoyaltyAccount::new("acc-1");
        account
            .record(LoyaltyTransactionKind::Earned, 600, "promo", None)
            .unwrap();
        account
            .record(LoyaltyTransactionKind::Redeemed, 550, "free dessert", None)
            .unwrap();

        assert_eq!(account.points, 50);
        assert_eq!(account.lifetime_points, 600);
        assert_eq!(account.tier, Tier::Silver);
    }

    #[test]
    fn test_over_redeem_fails_and_leaves_account_unchanged() {
        let mut account = LoyaltyAccount::new("acc-1");
        account
            .record(LoyaltyTransactionKind::Earned, 100, "promo", None)
            .unwrap();
        let before_len = account.transactions.len();

        let err = account
            .record(LoyaltyTransactionKind::Redeemed, 200, "free dessert", None)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientPoints {
                available: 100,
                requested: 200
            }
        ));
        assert_eq!(account.points, 100);
        assert_eq!(account.transactions.len(), before_len);
    }

    #[test]
    fn test_expiry_reduces_balance_only() {
        let mut account = LoyaltyAccount::new("acc-1");
        account
            .record(LoyaltyTransactionKind::Earned, 1600, "orders", None)
            .unwrap();
        account
            .record(LoyaltyTransactionKind::Expired, 100, "12-month expiry", None)
            .unwrap();

        assert_eq!(account.points, 1500);
        assert_eq!(account.lifetime_points, 1600);
        assert_eq!(account.tier, Tier::Gold);
    }

    #[test]
    fn test_non_positive_points_rejected() {
        let mut account = LoyaltyAccount::new("acc-1");
        assert!(account
            .record(LoyaltyTransactionKind::Earned, 0, "nothing", None)
            .is_err());
        assert!(account
            .record(LoyaltyTransactionKind::Earned, -5, "nothing", None)
            .is_err());
    }

    #[test]
    fn test_idempotent_record_no_ops_on_duplicate_key() {
        let mut account = LoyaltyAccount::new("acc-1");

        let appended = account
            .idempotent_record("order-7", LoyaltyTransactionKind::Earned, 31, "award", None)
            .unwrap();
        assert!(appended);

        let appended = account
            .idempotent_record("order-7", LoyaltyTransactionKind::Earned, 31, "award", None)
            .unwrap();
        assert!(!appended);

        assert_eq!(account.transactions.len(), 1);
        assert_eq!(account.points, 31);
    }

    #[test]
    fn test_rebuild_ignores_stored_rollups() {
        let mut account = LoyaltyAccount::new("acc-1");
        account
            .record(LoyaltyTransactionKind::Earned, 700, "orders", None)
            .unwrap();

        // Simulate a loaded document with tampered rollups.
        account.points = 9999;
        account.lifetime_points = 9999;
        account.tier = Tier::Platinum;

        account.rebuild();
        assert_eq!(account.points, 700);
        assert_eq!(account.lifetime_points, 700);
        assert_eq!(account.tier, Tier::Silver);
    }
}
