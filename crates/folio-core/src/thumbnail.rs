//! The single thumbnail of an edit session.
//!
//! Follows the same reference/pending duality as the detail image list and the
//! same upload-then-resolve rule, with room for exactly one image.

use crate::error::ImageRejection;
use crate::models::PendingPayload;
use crate::validation::{validate_image, ImageLimits};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ThumbnailSlot {
    #[default]
    Empty,
    Reference(String),
    Pending(PendingPayload),
}

impl ThumbnailSlot {
    /// Load an already persisted thumbnail; an empty string leaves the slot empty.
    pub fn set_existing(&mut self, url: impl Into<String>) {
        let url = url.into();
        *self = if url.is_empty() {
            ThumbnailSlot::Empty
        } else {
            ThumbnailSlot::Reference(url)
        };
    }

    /// Select a new file, replacing whatever the slot held.
    ///
    /// A rejected file leaves the slot unchanged.
    pub fn choose(
        &mut self,
        limits: &ImageLimits,
        payload: PendingPayload,
    ) -> Result<(), ImageRejection> {
        validate_image(limits, 0, &payload)?;
        *self = ThumbnailSlot::Pending(payload);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = ThumbnailSlot::Empty;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ThumbnailSlot::Empty)
    }

    pub fn pending(&self) -> Option<&PendingPayload> {
        match self {
            ThumbnailSlot::Pending(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            ThumbnailSlot::Reference(url) => Some(url),
            _ => None,
        }
    }

    /// The reference to persist. `uploaded` is the upload result for a pending
    /// thumbnail; it is ignored otherwise.
    pub fn resolve(&self, uploaded: Option<String>) -> Option<String> {
        match self {
            ThumbnailSlot::Empty => None,
            ThumbnailSlot::Reference(url) => Some(url.clone()),
            ThumbnailSlot::Pending(_) => uploaded,
        }
    }
}
