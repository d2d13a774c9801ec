//! # Promotion Repository
//!
//! Promotion lookup, engine-backed validation and the conditional
//! redemption counter.
//!
//! `usageCount` is shared state across every session, so the increment
//! goes through the versioned update: two diners redeeming the last use
//! of a code race cleanly, and the loser sees the limit already reached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::document::{collections, encode, DocumentStore};
use crate::error::{StoreError, StoreResult};
use comanda_core::promotion::validate;
use comanda_core::{DomainError, Money, Promotion, PromotionBenefit};

/// Repository for promotion documents (keyed by code).
#[derive(Clone)]
pub struct PromotionRepository {
    store: Arc<dyn DocumentStore>,
}

impl PromotionRepository {
    /// Creates a new PromotionRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        PromotionRepository { store }
    }

    /// Fetches a promotion by code.
    pub async fn by_code(&self, code: &str) -> StoreResult<Option<Promotion>> {
        match self.store.get(collections::PROMOTIONS, code).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Looks a code up and validates it against the order subtotal.
    ///
    /// Pure lookup + engine validation; nothing is written. The checkout
    /// flow calls this to price the benefit, then [`redeem`](Self::redeem)
    /// once the order is actually placed.
    pub async fn check(
        &self,
        code: &str,
        order_subtotal: Money,
        now: DateTime<Utc>,
    ) -> StoreResult<PromotionBenefit> {
        let promotion = self.by_code(code).await?;
        Ok(validate(promotion.as_ref(), code, order_subtotal, now)?)
    }

    /// Consumes one use of a promotion.
    ///
    /// Re-checks the limit against the loaded snapshot and increments
    /// `usageCount` behind the versioned update, so the last use of a
    /// code goes to exactly one order.
    pub async fn redeem(&self, code: &str) -> StoreResult<Promotion> {
        let doc = self
            .store
            .get(collections::PROMOTIONS, code)
            .await?
            .ok_or_else(|| StoreError::Domain(DomainError::PromotionNotFound(code.to_string())))?;

        let mut promotion: Promotion = doc.decode()?;
        if promotion.is_exhausted() {
            return Err(DomainError::PromotionExhausted(promotion.code).into());
        }
        promotion.usage_count += 1;

        self.store
            .update(collections::PROMOTIONS, code, doc.version, encode(&promotion)?)
            .await?;
        debug!(code, usage_count = promotion.usage_count, "promotion redeemed");
        Ok(promotion)
    }

    /// Seeds a promotion document (backoffice path).
    pub async fn upsert(&self, promotion: &Promotion) -> StoreResult<()> {
        self.store
            .put(collections::PROMOTIONS, &promotion.code, encode(promotion)?)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::TimeZone;
    use comanda_core::{Currency, PromotionType};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn promotion(usage_limit: Option<u32>) -> Promotion {
        Promotion {
            code: "SUMMER-10".to_string(),
            discount_type: PromotionType::Percentage,
            discount_value: 1000,
            max_discount: None,
            free_item_id: None,
            min_order_amount: None,
            starts_at: at(2025, 6, 1),
            ends_at: at(2025, 8, 31),
            usage_limit,
            usage_count: 0,
            active: true,
        }
    }

    fn eur(minor_units: i64) -> Money {
        Money::new(minor_units, Currency::Eur)
    }

    #[tokio::test]
    async fn test_check_validates_through_engine() {
        let repo = PromotionRepository::new(Arc::new(MemoryStore::new()));
        repo.upsert(&promotion(Some(10))).await.unwrap();

        let benefit = repo.check("SUMMER-10", eur(2000), at(2025, 7, 1)).await.unwrap();
        assert_eq!(benefit, PromotionBenefit::Discount { amount: eur(200) });

        let err = repo
            .check("NOPE", eur(2000), at(2025, 7, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::PromotionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_redeem_increments_until_exhausted() {
        let repo = PromotionRepository::new(Arc::new(MemoryStore::new()));
        repo.upsert(&promotion(Some(2))).await.unwrap();

        assert_eq!(repo.redeem("SUMMER-10").await.unwrap().usage_count, 1);
        assert_eq!(repo.redeem("SUMMER-10").await.unwrap().usage_count, 2);

        let err = repo.redeem("SUMMER-10").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::PromotionExhausted(_))
        ));

        // The exhausted code also fails checkout validation.
        let err = repo
            .check("SUMMER-10", eur(2000), at(2025, 7, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::PromotionExhausted(_))
        ));
    }

    #[tokio::test]
    async fn test_unlimited_codes_never_exhaust() {
        let repo = PromotionRepository::new(Arc::new(MemoryStore::new()));
        repo.upsert(&promotion(None)).await.unwrap();

        for expected in 1..=5 {
            assert_eq!(repo.redeem("SUMMER-10").await.unwrap().usage_count, expected);
        }
    }
}
