//! # Order Repository
//!
//! Persists order snapshots and runs status updates through the engine's
//! transition check before they reach the store.
//!
//! ## Order Round-Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. checkout screen: Order::create(cart, …)      (engine, pure)        │
//! │  2. place()          persist the frozen snapshot (this module)         │
//! │  3. kitchen screens: advance(id, target)                               │
//! │       └── load → Order::transition (engine) → conditional update       │
//! │                                                                         │
//! │  The conditional update means two staff devices advancing the same     │
//! │  order race cleanly: the loser gets Conflict, reloads, and sees the    │
//! │  status the winner already set.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::document::{collections, encode, DocumentStore, FieldFilter};
use crate::error::{StoreError, StoreResult};
use comanda_core::{Order, OrderStatus};

/// Repository for order documents.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn DocumentStore>,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        OrderRepository { store }
    }

    /// Persists a freshly created order snapshot.
    ///
    /// Uses the conditional create: replaying the same checkout (a retry
    /// after a dropped response) conflicts instead of silently
    /// overwriting the first write.
    pub async fn place(&self, order: &Order) -> StoreResult<()> {
        debug!(id = %order.id, total = %order.total, "placing order");
        self.store
            .create(collections::ORDERS, &order.id, encode(order)?)
            .await?;
        Ok(())
    }

    /// Fetches one order by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        match self.store.get(collections::ORDERS, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists orders in a given status (kitchen/backoffice boards).
    pub async fn with_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        let docs = self
            .store
            .list(
                collections::ORDERS,
                Some(FieldFilter::new("status", encode(&status)?)),
            )
            .await?;
        docs.iter().map(|d| d.decode()).collect()
    }

    /// Advances an order along the status graph.
    ///
    /// The engine validates the edge; the conditional update makes sure a
    /// concurrent writer cannot be silently overwritten.
    pub async fn advance(&self, id: &str, target: OrderStatus) -> StoreResult<Order> {
        let doc = self
            .store
            .get(collections::ORDERS, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::ORDERS.to_string(),
                id: id.to_string(),
            })?;

        let order: Order = doc.decode()?;
        let next = order.transition(target)?;

        self.store
            .update(collections::ORDERS, id, doc.version, encode(&next)?)
            .await?;
        debug!(id, status = %next.status, "order advanced");
        Ok(next)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
