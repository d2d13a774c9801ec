//! # Cart Sessions
//!
//! Explicit load/save of the cart at session boundaries.
//!
//! The cart is owned by exactly one client session and lives in memory
//! while the app runs; this module persists it so a killed app restores
//! the diner's cart on the next launch. The stored document is restored
//! verbatim and every derived total is recomputed - storage is never
//! trusted for money.

use std::sync::Arc;

use tracing::debug;

use crate::document::{collections, encode, DocumentStore};
use crate::error::StoreResult;
use comanda_core::Cart;

/// Load/save boundary for session carts, keyed by session id.
#[derive(Clone)]
pub struct CartSessions {
    store: Arc<dyn DocumentStore>,
}

impl CartSessions {
    /// Creates a new CartSessions adapter.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CartSessions { store }
    }

    /// Persists the session's cart.
    pub async fn save(&self, session_id: &str, cart: &Cart) -> StoreResult<()> {
        self.store
            .put(collections::CARTS, session_id, encode(cart)?)
            .await?;
        debug!(session = session_id, lines = cart.lines.len(), "cart saved");
        Ok(())
    }

    /// Restores the session's cart, recomputing all derived totals.
    pub async fn load(&self, session_id: &str) -> StoreResult<Option<Cart>> {
        match self.store.get(collections::CARTS, session_id).await? {
            Some(doc) => {
                let cart: Cart = doc.decode()?;
                Ok(Some(cart.restored()))
            }
            None => Ok(None),
        }
    }

    /// Drops the persisted cart (after checkout or an explicit clear).
    pub async fn discard(&self, session_id: &str) -> StoreResult<()> {
        self.store.delete(collections::CARTS, session_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use comanda_core::{Currency, MenuItem, Money, Rate};

    fn filled_cart() -> Cart {
        let mut cart = Cart::new(Currency::Eur, Rate::from_bps(1000));
        let item = MenuItem {
            id: "tortilla".to_string(),
            name: "Tortilla".to_string(),
            price: Money::new(899, Currency::Eur),
            modifiers: Vec::new(),
            available: true,
        };
        cart.add_item(&item, 2, vec![], "").unwrap();
        cart
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let sessions = CartSessions::new(Arc::new(MemoryStore::new()));
        let cart = filled_cart();

        sessions.save("session-1", &cart).await.unwrap();
        let loaded = sessions.load("session-1").await.unwrap().unwrap();

        assert_eq!(loaded.lines.len(), 1);
        assert_eq!(loaded.total, cart.total);

        assert!(sessions.load("session-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_recomputes_tampered_totals() {
        let store = Arc::new(MemoryStore::new());
        let sessions = CartSessions::new(store.clone());
        let cart = filled_cart();
        sessions.save("session-1", &cart).await.unwrap();

        // Corrupt the persisted totals directly.
        let doc = store.get(collections::CARTS, "session-1").await.unwrap().unwrap();
        let mut data = doc.data.clone();
        data["total"]["minorUnits"] = serde_json::json!(1);
        data["subtotal"]["minorUnits"] = serde_json::json!(1);
        store.put(collections::CARTS, "session-1", data).await.unwrap();

        let loaded = sessions.load("session-1").await.unwrap().unwrap();
        assert_eq!(loaded.subtotal.minor_units(), 1798);
        assert_eq!(loaded.total, cart.total);
    }

    #[tokio::test]
    async fn test_discard() {
        let sessions = CartSessions::new(Arc::new(MemoryStore::new()));
        sessions.save("session-1", &filled_cart()).await.unwrap();

        sessions.discard("session-1").await.unwrap();
        assert!(sessions.load("session-1").await.unwrap().is_none());

        // Discarding an absent cart is a no-op.
        sessions.discard("session-1").await.unwrap();
    }
}
