//! Storage abstraction traits
//!
//! This module defines the blob and document store traits every backend implements.

use crate::changes::Subscription;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use folio_core::Record;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Where an uploaded blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Permanent, dereferenceable URL; this is what records store
    pub url: String,
    /// Backend path, used to delete the blob later
    pub path: String,
}

/// Blob store abstraction trait
///
/// All blob backends (local filesystem, in-memory) implement this trait so the
/// admin core never couples to a specific backend.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a fresh path inside `path_hint` and return its URL and path.
    ///
    /// `filename` is the operator's original file name; only its stem and
    /// extension survive into the path.
    async fn upload(
        &self,
        path_hint: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredBlob>;

    /// Download a blob by its path
    async fn download(&self, path: &str) -> StorageResult<Bytes>;

    /// Delete a blob by its path; deleting a missing blob succeeds
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Check if a blob exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// The path of a URL this store handed out, or `None` for foreign URLs
    /// (static site assets, other hosts).
    fn path_for_url(&self, url: &str) -> Option<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Document store abstraction trait
///
/// Collections of flat JSON records keyed by id. Writes are whole-document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every record of a collection, ordered by id
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Record>>;

    /// Read one record
    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Record>>;

    /// Full-document upsert; the stored record carries `id`
    async fn put(&self, collection: &str, id: &str, record: Record) -> StorageResult<Record>;

    /// Delete a record; deleting a missing record succeeds
    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()>;

    /// Receive the collection's full snapshot after every change.
    ///
    /// Dropping the subscription unsubscribes.
    async fn subscribe(&self, collection: &str) -> StorageResult<Subscription>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
