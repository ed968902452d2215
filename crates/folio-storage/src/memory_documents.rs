//! In-memory document store

use crate::changes::{ChangeFeed, Subscription};
use crate::keys::validate_segment;
use crate::traits::{DocumentStore, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use folio_core::Record;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Collection = BTreeMap<String, Record>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    changes: ChangeFeed,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(collection: Option<&Collection>) -> Vec<Record> {
        collection
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Record>> {
        validate_segment(collection)?;
        Ok(Self::snapshot(self.collections.read().await.get(collection)))
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Record>> {
        validate_segment(collection)?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, mut record: Record) -> StorageResult<Record> {
        validate_segment(collection)?;
        validate_segment(id)?;
        record.id = id.to_string();

        // Publish under the write lock so snapshots arrive in write order
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();
        records.insert(id.to_string(), record.clone());
        tracing::debug!(collection = %collection, id = %id, "Document written");

        let snapshot = Self::snapshot(Some(&*records));
        self.changes.publish(collection, snapshot).await;
        Ok(record)
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        validate_segment(collection)?;

        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(());
        };
        if records.remove(id).is_none() {
            return Ok(());
        }
        tracing::debug!(collection = %collection, id = %id, "Document deleted");

        let snapshot = Self::snapshot(Some(&*records));
        self.changes.publish(collection, snapshot).await;
        Ok(())
    }

    async fn subscribe(&self, collection: &str) -> StorageResult<Subscription> {
        validate_segment(collection)?;
        Ok(self.changes.subscribe(collection).await)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
