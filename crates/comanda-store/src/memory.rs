//! # In-Memory Document Store
//!
//! A `DocumentStore` implementation backed by process memory.
//!
//! Stands in for the remote database in every adapter test and in demo
//! setups. The conditional semantics (create-if-absent, versioned
//! update) match the contract exactly, so the repositories exercise the
//! same code paths they run against the real driver.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::document::{Document, DocumentStore, FieldFilter, StoreEvent, StoreEventKind};
use crate::error::{StoreError, StoreResult};

/// Capacity of each collection's event channel; laggy subscribers drop
/// old events rather than block writers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// In-memory `DocumentStore`.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
    channels: RwLock<HashMap<String, broadcast::Sender<StoreEvent>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn emit(&self, collection: &str, id: &str, kind: StoreEventKind) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(collection) {
            // No subscribers is fine; the event just evaporates.
            let _ = sender.send(StoreEvent {
                collection: collection.to_string(),
                id: id.to_string(),
                kind,
            });
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(
        &self,
        collection: &str,
        filter: Option<FieldFilter>,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|d| filter.as_ref().map(|f| f.matches(&d.data)).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Deterministic order for callers and tests.
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    async fn create(&self, collection: &str, id: &str, data: Value) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(id) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let doc = Document {
            id: id.to_string(),
            version: 1,
            data,
            updated_at: Utc::now(),
        };
        docs.insert(id.to_string(), doc.clone());
        drop(collections);

        debug!(collection, id, "document created");
        self.emit(collection, id, StoreEventKind::Created).await;
        Ok(doc)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let (version, kind) = match docs.get(id) {
            Some(existing) => (existing.version + 1, StoreEventKind::Updated),
            None => (1, StoreEventKind::Created),
        };
        let doc = Document {
            id: id.to_string(),
            version,
            data,
            updated_at: Utc::now(),
        };
        docs.insert(id.to_string(), doc.clone());
        drop(collections);

        debug!(collection, id, version, "document written");
        self.emit(collection, id, kind).await;
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        data: Value,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let existing = docs.get(id).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        if existing.version != expected_version {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let doc = Document {
            id: id.to_string(),
            version: existing.version + 1,
            data,
            updated_at: Utc::now(),
        };
        docs.insert(id.to_string(), doc.clone());
        drop(collections);

        debug!(collection, id, version = doc.version, "document updated");
        self.emit(collection, id, StoreEventKind::Updated).await;
        Ok(doc)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false);
        drop(collections);

        if removed {
            debug!(collection, id, "document deleted");
            self.emit(collection, id, StoreEventKind::Deleted).await;
        }
        Ok(())
    }

    async fn subscribe(&self, collection: &str) -> StoreResult<broadcast::Receiver<StoreEvent>> {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0);
        Ok(sender.subscribe())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
