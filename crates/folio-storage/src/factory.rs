#[cfg(feature = "storage-local")]
use crate::{LocalDocumentStore, LocalStorage};
#[cfg(feature = "storage-memory")]
use crate::{MemoryDocumentStore, MemoryStorage};
use crate::{BlobStore, DocumentStore, StorageBackend, StorageError, StorageResult};
use folio_core::AdminConfig;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_storage(config: &AdminConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}

/// Create a document store based on configuration
pub async fn create_document_store(config: &AdminConfig) -> StorageResult<Arc<dyn DocumentStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let root = config.document_store_path.clone().ok_or_else(|| {
                StorageError::ConfigError("DOCUMENT_STORE_PATH not configured".to_string())
            })?;

            let store = LocalDocumentStore::new(root).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryDocumentStore::new())),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-memory"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_backend() {
        let config = AdminConfig::default();
        let blobs = create_storage(&config).await.unwrap();
        let docs = create_document_store(&config).await.unwrap();
        assert_eq!(blobs.backend_type(), StorageBackend::Memory);
        assert_eq!(docs.backend_type(), StorageBackend::Memory);
    }

    #[tokio::test]
    async fn test_local_backend() {
        let dir = tempdir().unwrap();
        let config = AdminConfig {
            storage_backend: StorageBackend::Local,
            local_storage_path: Some(dir.path().join("media").display().to_string()),
            local_storage_base_url: Some("http://localhost:8080/media".to_string()),
            document_store_path: Some(dir.path().join("docs").display().to_string()),
            ..AdminConfig::default()
        };
        let blobs = create_storage(&config).await.unwrap();
        let docs = create_document_store(&config).await.unwrap();
        assert_eq!(blobs.backend_type(), StorageBackend::Local);
        assert_eq!(docs.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_local_backend_missing_path() {
        let config = AdminConfig {
            storage_backend: StorageBackend::Local,
            ..AdminConfig::default()
        };
        assert!(matches!(
            create_storage(&config).await,
            Err(StorageError::ConfigError(_))
        ));
    }
}
