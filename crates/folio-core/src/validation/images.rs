//! Image acceptance rules shared by the detail image list and the thumbnail slot.

use crate::constants::{IMAGE_MIME_PREFIX, MAX_IMAGE_SIZE_BYTES};
use crate::error::{ImageRejection, RejectReason};
use crate::models::PendingPayload;

/// Limits an image must satisfy before it is accepted into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLimits {
    pub mime_prefix: String,
    pub max_size_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            mime_prefix: IMAGE_MIME_PREFIX.to_string(),
            max_size_bytes: MAX_IMAGE_SIZE_BYTES,
        }
    }
}

impl ImageLimits {
    pub fn with_max_size(max_size_bytes: u64) -> Self {
        Self {
            max_size_bytes,
            ..Self::default()
        }
    }
}

/// Check one payload; `index` is its position in the batch being added.
pub fn validate_image(
    limits: &ImageLimits,
    index: usize,
    payload: &PendingPayload,
) -> Result<(), ImageRejection> {
    let reason = if !payload.mime_type.starts_with(&limits.mime_prefix) {
        Some(RejectReason::NotAnImage {
            mime_type: payload.mime_type.clone(),
        })
    } else if payload.size_bytes > limits.max_size_bytes {
        Some(RejectReason::TooLarge {
            size_bytes: payload.size_bytes,
            limit_bytes: limits.max_size_bytes,
        })
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ImageRejection {
            index,
            name: payload.name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Check a whole batch, reporting the first offending file.
pub fn validate_batch(
    limits: &ImageLimits,
    payloads: &[PendingPayload],
) -> Result<(), ImageRejection> {
    payloads
        .iter()
        .enumerate()
        .try_for_each(|(index, payload)| validate_image(limits, index, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(name: &str, mime: &str, size_bytes: u64) -> PendingPayload {
        PendingPayload {
            size_bytes,
            ..PendingPayload::new(name, mime, Vec::new())
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let limits = ImageLimits::default();
        assert!(validate_image(&limits, 0, &declared("a.png", "image/png", 5_242_880)).is_ok());

        let err =
            validate_image(&limits, 0, &declared("a.png", "image/png", 5_242_881)).unwrap_err();
        assert_eq!(
            err.reason,
            RejectReason::TooLarge {
                size_bytes: 5_242_881,
                limit_bytes: 5_242_880
            }
        );
    }

    #[test]
    fn test_mime_prefix_required() {
        let limits = ImageLimits::default();
        let err =
            validate_image(&limits, 3, &declared("doc.pdf", "application/pdf", 10)).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.name, "doc.pdf");
        assert!(matches!(err.reason, RejectReason::NotAnImage { .. }));
    }

    #[test]
    fn test_batch_reports_first_offender() {
        let limits = ImageLimits::with_max_size(100);
        let batch = vec![
            declared("ok.jpg", "image/jpeg", 10),
            declared("big.jpg", "image/jpeg", 101),
            declared("text.txt", "text/plain", 1),
        ];
        let err = validate_batch(&limits, &batch).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.name, "big.jpg");
    }
}
