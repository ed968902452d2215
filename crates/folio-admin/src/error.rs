//! Errors raised by a save attempt and by the catalog.

use folio_core::{ErrorMetadata, ImageRejection, ImageSetError, LogLevel};
use folio_storage::StorageError;
use thiserror::Error;

/// Why a save attempt did not persist a record.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error(transparent)]
    ImageRejected(#[from] ImageRejection),

    #[error("Image upload failed: {cause}")]
    Upload {
        #[source]
        cause: StorageError,
        /// Blob paths uploaded by this attempt that no record references
        orphaned: Vec<String>,
    },

    #[error("Saving the record failed: {cause}")]
    Persistence {
        #[source]
        cause: StorageError,
        orphaned: Vec<String>,
    },

    #[error("Invariant violation: {reason}")]
    InvariantViolation {
        reason: String,
        orphaned: Vec<String>,
    },

    #[error("A save is already in progress")]
    Busy,
}

impl SubmitError {
    /// Blobs left behind by the failed attempt, for manual or batch reconciliation.
    pub fn orphaned_blobs(&self) -> &[String] {
        match self {
            SubmitError::Upload { orphaned, .. }
            | SubmitError::Persistence { orphaned, .. }
            | SubmitError::InvariantViolation { orphaned, .. } => orphaned,
            _ => &[],
        }
    }
}

impl From<ImageSetError> for SubmitError {
    fn from(err: ImageSetError) -> Self {
        match err {
            ImageSetError::Rejected(rejection) => SubmitError::ImageRejected(rejection),
            other => SubmitError::InvariantViolation {
                reason: other.to_string(),
                orphaned: Vec::new(),
            },
        }
    }
}

impl ErrorMetadata for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            SubmitError::Validation { .. } => "VALIDATION_ERROR",
            SubmitError::ImageRejected(_) => "IMAGE_REJECTED",
            SubmitError::Upload { .. } => "UPLOAD_FAILED",
            SubmitError::Persistence { .. } => "PERSISTENCE_FAILED",
            SubmitError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            SubmitError::Busy => "BUSY",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubmitError::Upload { .. } | SubmitError::Persistence { .. } | SubmitError::Busy
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            SubmitError::Validation { .. } => Some("Fill in every required field"),
            SubmitError::ImageRejected(_) => Some("Choose image files within the size limit"),
            SubmitError::Upload { .. } | SubmitError::Persistence { .. } => {
                Some("Check the connection and save again")
            }
            SubmitError::InvariantViolation { .. } => Some("Report this as a defect"),
            SubmitError::Busy => Some("Wait for the current save to finish"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            SubmitError::Validation { .. } => {
                "Please fill in every required field and choose a thumbnail".to_string()
            }
            SubmitError::ImageRejected(rejection) => rejection.to_string(),
            SubmitError::Upload { .. } => {
                "An image could not be uploaded; nothing was saved".to_string()
            }
            SubmitError::Persistence { .. } => "The portfolio could not be saved".to_string(),
            SubmitError::InvariantViolation { .. } => {
                "Internal error while preparing the save; nothing was saved".to_string()
            }
            SubmitError::Busy => self.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmitError::Validation { .. } | SubmitError::ImageRejected(_) | SubmitError::Busy => {
                LogLevel::Debug
            }
            SubmitError::Upload { .. } | SubmitError::Persistence { .. } => LogLevel::Warn,
            SubmitError::InvariantViolation { .. } => LogLevel::Error,
        }
    }
}

/// Catalog (list, read, delete) errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Portfolio not found: {0}")]
    NotFound(String),

    #[error("Stored portfolio {id} is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ErrorMetadata for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "NOT_FOUND",
            CatalogError::Malformed { .. } => "MALFORMED_RECORD",
            CatalogError::Storage(_) => "STORAGE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, CatalogError::Storage(_))
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            CatalogError::NotFound(_) => Some("Refresh the list"),
            CatalogError::Malformed { .. } => Some("Repair the stored document"),
            CatalogError::Storage(_) => Some("Try again"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            CatalogError::NotFound(id) => format!("Portfolio '{}' does not exist", id),
            CatalogError::Malformed { id, .. } => format!("Portfolio '{}' could not be read", id),
            CatalogError::Storage(_) => "Storage is unavailable".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            CatalogError::NotFound(_) => LogLevel::Debug,
            CatalogError::Malformed { .. } | CatalogError::Storage(_) => LogLevel::Error,
        }
    }
}
