//! Folio Core Library
//!
//! This crate provides the domain models, the in-memory image ordering state of an
//! edit session, validation, error metadata and configuration shared by all Folio
//! components.

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod image_set;
pub mod models;
pub mod storage_types;
pub mod thumbnail;
pub mod validation;

// Re-export commonly used types
pub use config::{AdminConfig, RequiredFields};
pub use error::{ErrorMetadata, ImageRejection, ImageSetError, LogLevel, RejectReason};
pub use ids::generate_entity_id;
pub use image_set::{ImageLimits, OrderedImageSet};
pub use models::{ImageEntry, PendingId, PendingPayload, PortfolioDraft, PortfolioRecord, Record};
pub use storage_types::StorageBackend;
pub use thumbnail::ThumbnailSlot;
