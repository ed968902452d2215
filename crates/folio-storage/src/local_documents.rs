use crate::changes::{ChangeFeed, Subscription};
use crate::keys::validate_segment;
use crate::traits::{DocumentStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use folio_core::Record;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Document store keeping one JSON file per record:
/// `{root}/{collection}/{id}.json`.
pub struct LocalDocumentStore {
    root: PathBuf,
    changes: ChangeFeed,
    // Serialises writes so each published snapshot reflects exactly one change
    write_lock: Mutex<()>,
}

impl LocalDocumentStore {
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create document directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            root,
            changes: ChangeFeed::default(),
            write_lock: Mutex::new(()),
        })
    }

    fn collection_dir(&self, collection: &str) -> StorageResult<PathBuf> {
        validate_segment(collection)?;
        Ok(self.root.join(collection))
    }

    fn record_path(&self, collection: &str, id: &str) -> StorageResult<PathBuf> {
        validate_segment(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }

    async fn read_record(path: &Path) -> StorageResult<Record> {
        let raw = fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn read_collection(&self, collection: &str) -> StorageResult<Vec<Record>> {
        let dir = self.collection_dir(collection)?;
        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "Skipping unreadable document"
                    );
                }
            }
        }

        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn notify(&self, collection: &str) {
        if !self.changes.has_subscribers(collection).await {
            return;
        }
        match self.read_collection(collection).await {
            Ok(snapshot) => self.changes.publish(collection, snapshot).await,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    collection = %collection,
                    "Failed to build snapshot for subscribers"
                );
            }
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Record>> {
        self.read_collection(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Record>> {
        let path = self.record_path(collection, id)?;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        Self::read_record(&path).await.map(Some)
    }

    async fn put(&self, collection: &str, id: &str, mut record: Record) -> StorageResult<Record> {
        let path = self.record_path(collection, id)?;
        record.id = id.to_string();
        let body = serde_json::to_vec_pretty(&record)?;

        let _guard = self.write_lock.lock().await;
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write then rename so readers never see a half-written document
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create {}: {}", tmp.display(), e))
        })?;
        file.write_all(&body).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            collection = %collection,
            id = %id,
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document written"
        );

        self.notify(collection).await;
        Ok(record)
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        let path = self.record_path(collection, id)?;

        let _guard = self.write_lock.lock().await;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;

        tracing::info!(collection = %collection, id = %id, "Document deleted");

        self.notify(collection).await;
        Ok(())
    }

    async fn subscribe(&self, collection: &str) -> StorageResult<Subscription> {
        validate_segment(collection)?;
        Ok(self.changes.subscribe(collection).await)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
