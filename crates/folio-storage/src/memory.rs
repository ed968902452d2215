//! In-memory blob storage, for development runs and tests

use crate::keys::{generate_blob_path, validate_key};
use crate::traits::{BlobStore, StorageError, StorageResult, StoredBlob};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// URL prefix of every blob this store hands out.
pub const MEMORY_BASE_URL: &str = "memory://blobs";

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    data: Bytes,
}

/// Blob storage that keeps every object in a map
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs (for test assertions)
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Every stored path, sorted
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Content type recorded at upload
    pub async fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|object| object.content_type.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryStorage {
    async fn upload(
        &self,
        path_hint: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredBlob> {
        let path = generate_blob_path(path_hint, filename)?;
        let size = data.len();

        self.objects.write().await.insert(
            path.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );

        tracing::debug!(path = %path, size_bytes = size, "Memory storage upload");

        Ok(StoredBlob {
            url: format!("{}/{}", MEMORY_BASE_URL, path),
            path,
        })
    }

    async fn download(&self, path: &str) -> StorageResult<Bytes> {
        validate_key(path)?;
        self.objects
            .read()
            .await
            .get(path)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        validate_key(path)?;
        if self.objects.write().await.remove(path).is_some() {
            tracing::debug!(path = %path, "Memory storage delete");
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        validate_key(path)?;
        Ok(self.objects.read().await.contains_key(path))
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        let path = url.strip_prefix(MEMORY_BASE_URL)?.strip_prefix('/')?;
        validate_key(path).ok().map(|_| path.to_string())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
