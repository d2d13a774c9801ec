//! # Loyalty Repository
//!
//! Loads loyalty accounts, replays their ledgers, and persists mutations
//! behind a conditional write so concurrent devices cannot lose updates.
//!
//! ## At-Most-Once Award Under At-Least-Once Delivery
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The caller retries award_for_order() until it gets an answer.          │
//! │                                                                         │
//! │  retry path A: the first write landed → the ledger already holds a      │
//! │    transaction with the order id → the engine appends nothing.          │
//! │  retry path B: a concurrent device moved the account → the              │
//! │    conditional update returns Conflict → retry reloads and re-runs      │
//! │    the idempotent record.                                               │
//! │                                                                         │
//! │  Either way at most one transaction per order id ever exists.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::document::{collections, encode, DocumentStore};
use crate::error::StoreResult;
use comanda_core::{LoyaltyAccount, LoyaltyTransactionKind, Order};

/// Repository for loyalty account documents.
#[derive(Clone)]
pub struct LoyaltyRepository {
    store: Arc<dyn DocumentStore>,
}

impl LoyaltyRepository {
    /// Creates a new LoyaltyRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        LoyaltyRepository { store }
    }

    /// Fetches an account, replaying the ledger.
    ///
    /// Absent accounts start empty at bronze; stored rollups are
    /// discarded and recomputed from the transaction log.
    pub async fn account(&self, account_id: &str) -> StoreResult<LoyaltyAccount> {
        Ok(self.load(account_id).await?.0)
    }

    /// Awards an order's points to its customer, at most once.
    ///
    /// Returns whether a transaction was appended; `Ok(false)` for guest
    /// orders, zero-point orders and replayed awards.
    pub async fn award_for_order(&self, order: &Order) -> StoreResult<bool> {
        let account_id = match &order.customer_id {
            Some(id) => id.clone(),
            None => return Ok(false),
        };

        let (mut account, version) = self.load(&account_id).await?;
        let appended = order.award_loyalty(&mut account)?;
        if appended {
            self.save(&account, version).await?;
            debug!(account = %account_id, order = %order.id, points = order.points_earned(), "loyalty awarded");
        }
        Ok(appended)
    }

    /// Redeems points from an account.
    ///
    /// The engine rejects over-redemption before anything is written.
    pub async fn redeem(
        &self,
        account_id: &str,
        points: i64,
        reason: &str,
    ) -> StoreResult<LoyaltyAccount> {
        let (mut account, version) = self.load(account_id).await?;
        account.record(LoyaltyTransactionKind::Redeemed, points, reason, None)?;
        self.save(&account, version).await?;
        debug!(account = %account_id, points, "points redeemed");
        Ok(account)
    }

    async fn load(&self, account_id: &str) -> StoreResult<(LoyaltyAccount, Option<u64>)> {
        match self.store.get(collections::LOYALTY_POINTS, account_id).await? {
            Some(doc) => {
                let mut account: LoyaltyAccount = doc.decode()?;
                account.rebuild();
                Ok((account, Some(doc.version)))
            }
            None => Ok((LoyaltyAccount::new(account_id), None)),
        }
    }

    /// Persists the account: create for new accounts, conditional update
    /// for existing ones. A `Conflict` means another device wrote first -
    /// the caller reloads and retries.
    async fn save(&self, account: &LoyaltyAccount, version: Option<u64>) -> StoreResult<()> {
        let data = encode(account)?;
        match version {
            Some(version) => {
                self.store
                    .update(collections::LOYALTY_POINTS, &account.account_id, version, data)
                    .await?;
            }
            None => {
                self.store
                    .create(collections::LOYALTY_POINTS, &account.account_id, data)
                    .await?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
