//! # Catalog Repository
//!
//! Read-only access to menu items and categories. The catalog is the
//! input to the cart; the cart freezes whatever it reads here.

use std::sync::Arc;

use crate::document::{collections, encode, DocumentStore, FieldFilter};
use crate::error::StoreResult;
use comanda_core::{Category, MenuItem};

/// Repository for catalog reads.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn DocumentStore>,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CatalogRepository { store }
    }

    /// Fetches one menu item by id.
    pub async fn menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        match self.store.get(collections::MENU_ITEMS, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists the full menu, including items the kitchen has paused.
    pub async fn menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        let docs = self.store.list(collections::MENU_ITEMS, None).await?;
        docs.iter().map(|d| d.decode()).collect()
    }

    /// Lists only the items currently being served.
    pub async fn available_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        let docs = self
            .store
            .list(
                collections::MENU_ITEMS,
                Some(FieldFilter::new("available", true)),
            )
            .await?;
        docs.iter().map(|d| d.decode()).collect()
    }

    /// Lists active categories in menu order.
    pub async fn categories(&self) -> StoreResult<Vec<Category>> {
        let docs = self
            .store
            .list(collections::CATEGORIES, Some(FieldFilter::new("active", true)))
            .await?;
        let mut categories: Vec<Category> =
            docs.iter().map(|d| d.decode()).collect::<StoreResult<_>>()?;
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    /// Seeds a menu item document (backoffice path).
    pub async fn upsert_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        self.store
            .put(collections::MENU_ITEMS, &item.id, encode(item)?)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
