//! Folio Storage Library
//!
//! This crate provides the blob and document store abstractions the admin core
//! consumes, with local filesystem and in-memory implementations of both.
//!
//! # Blob path format
//!
//! Blob paths are namespaced by the caller's path hint:
//! `{path_hint}/{unix_millis}_{random}_{stem}.{ext}`, e.g.
//! `portfolios/pumdt_1644/details/1644000000000_3f9c1a0b2d4e5_cover.jpg`.
//!
//! Paths must not contain `..` or a leading `/`. Path generation is centralized in
//! the `keys` module so all backends stay consistent.
//!
//! # Documents
//!
//! Documents are `folio_core::Record`s grouped in named collections. Every write
//! publishes the collection's full new snapshot to its subscribers.

pub(crate) mod changes;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-local")]
pub mod local_documents;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-memory")]
pub mod memory_documents;
pub mod traits;

// Re-export commonly used types
pub use changes::Subscription;
pub use factory::{create_document_store, create_storage};
pub use folio_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-local")]
pub use local_documents::LocalDocumentStore;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
#[cfg(feature = "storage-memory")]
pub use memory_documents::MemoryDocumentStore;
pub use traits::{BlobStore, DocumentStore, StorageError, StorageResult, StoredBlob};
