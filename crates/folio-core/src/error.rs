//! Error types module
//!
//! Errors raised by the in-memory session state (image batches, resolution) and the
//! `ErrorMetadata` trait every Folio error implements so the operator-facing layer
//! can present it without matching on concrete types.

use std::fmt;

use crate::models::PendingId;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failed upload
    Warn,
    /// Error level - for unexpected failures and defects
    Error,
}

/// Metadata for operator-facing error reporting
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether pressing save again can succeed without changing the input
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the operator
    fn suggested_action(&self) -> Option<&'static str>;

    /// Human-readable message shown to the operator
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Why a pending image was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotAnImage { mime_type: String },
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

/// A batch of pending images was refused because of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRejection {
    /// Position of the offending file within the submitted batch
    pub index: usize,
    /// File name as given by the operator
    pub name: String,
    pub reason: RejectReason,
}

impl fmt::Display for ImageRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectReason::NotAnImage { mime_type } => write!(
                f,
                "File '{}' is not an image (type '{}'); only image files can be uploaded",
                self.name, mime_type
            ),
            RejectReason::TooLarge {
                size_bytes,
                limit_bytes,
            } => write!(
                f,
                "File '{}' is {} bytes; each image must be at most {} bytes ({} MiB)",
                self.name,
                size_bytes,
                limit_bytes,
                limit_bytes / (1024 * 1024)
            ),
        }
    }
}

impl std::error::Error for ImageRejection {}

#[derive(Debug, thiserror::Error)]
pub enum ImageSetError {
    #[error(transparent)]
    Rejected(#[from] ImageRejection),

    #[error("Invariant violation: {actual} upload results for {expected} pending images")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("Invariant violation: no upload result for pending image {0}")]
    MissingResult(PendingId),
}

impl ImageSetError {
    /// True for the programming-error class; these must abort a save.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, ImageSetError::Rejected(_))
    }
}

impl ErrorMetadata for ImageSetError {
    fn error_code(&self) -> &'static str {
        match self {
            ImageSetError::Rejected(_) => "IMAGE_REJECTED",
            ImageSetError::ResultCountMismatch { .. } | ImageSetError::MissingResult(_) => {
                "INVARIANT_VIOLATION"
            }
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            ImageSetError::Rejected(_) => Some("Choose image files within the size limit"),
            _ => Some("Report this as a defect"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            ImageSetError::Rejected(rejection) => rejection.to_string(),
            _ => "Internal error while ordering images; nothing was saved".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ImageSetError::Rejected(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_names_file_and_limit() {
        let err = ImageRejection {
            index: 2,
            name: "huge.png".to_string(),
            reason: RejectReason::TooLarge {
                size_bytes: 6 * 1024 * 1024,
                limit_bytes: 5 * 1024 * 1024,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("huge.png"));
        assert!(msg.contains("5242880"));
        assert!(msg.contains("5 MiB"));
    }

    #[test]
    fn test_error_metadata_invariant_violation() {
        let err = ImageSetError::ResultCountMismatch {
            expected: 2,
            actual: 1,
        };
        assert!(err.is_invariant_violation());
        assert_eq!(err.error_code(), "INVARIANT_VIOLATION");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_rejected() {
        let err = ImageSetError::from(ImageRejection {
            index: 0,
            name: "notes.txt".to_string(),
            reason: RejectReason::NotAnImage {
                mime_type: "text/plain".to_string(),
            },
        });
        assert!(!err.is_invariant_violation());
        assert_eq!(err.error_code(), "IMAGE_REJECTED");
        assert!(err.client_message().contains("notes.txt"));
        assert_eq!(err.log_level(), LogLevel::Debug);
    }
}
