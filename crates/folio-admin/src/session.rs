//! One add/edit interaction: form fields, detail images and thumbnail.

use folio_core::{ImageLimits, OrderedImageSet, PortfolioDraft, PortfolioRecord, ThumbnailSlot};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionMode {
    Create,
    /// Editing a stored record; its id, `createdAt` and unknown fields are kept
    Edit(PortfolioRecord),
}

/// State of one add/edit form, owned by that interaction alone.
///
/// Nothing here touches storage; the coordinator reads it on save.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub mode: SessionMode,
    pub draft: PortfolioDraft,
    pub images: OrderedImageSet,
    pub thumbnail: ThumbnailSlot,
}

impl EditSession {
    pub fn create() -> Self {
        Self::create_with_limits(ImageLimits::default())
    }

    pub fn create_with_limits(limits: ImageLimits) -> Self {
        Self {
            mode: SessionMode::Create,
            draft: PortfolioDraft::default(),
            images: OrderedImageSet::with_limits(limits),
            thumbnail: ThumbnailSlot::Empty,
        }
    }

    pub fn edit(record: PortfolioRecord) -> Self {
        Self::edit_with_limits(record, ImageLimits::default())
    }

    /// Open a stored record: the draft, images and thumbnail start from it.
    pub fn edit_with_limits(record: PortfolioRecord, limits: ImageLimits) -> Self {
        let mut images = OrderedImageSet::with_limits(limits);
        images.set_existing(record.images.iter().cloned());

        let mut thumbnail = ThumbnailSlot::Empty;
        thumbnail.set_existing(record.thumbnail.clone());

        Self {
            draft: PortfolioDraft::from_record(&record),
            mode: SessionMode::Edit(record),
            images,
            thumbnail,
        }
    }

    /// The record being edited, if any.
    pub fn original(&self) -> Option<&PortfolioRecord> {
        match &self.mode {
            SessionMode::Create => None,
            SessionMode::Edit(record) => Some(record),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, SessionMode::Edit(_))
    }

    /// True when saving would upload at least one file.
    pub fn has_pending_uploads(&self) -> bool {
        self.thumbnail.pending().is_some() || self.images.pending_count() > 0
    }

    /// Reset the image state after a successful save.
    pub(crate) fn clear_images(&mut self) {
        self.images.clear();
        self.thumbnail.clear();
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::create()
    }
}
