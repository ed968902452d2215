use bytes::Bytes;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Identity of a pending image within the set that accepted it.
///
/// Two pending images with identical bytes still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(pub(crate) u64);

impl Display for PendingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "pending#{}", self.0)
    }
}

/// An image selected locally and held in memory until the session is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayload {
    pub name: String,
    pub mime_type: String,
    /// Declared size; this is what the size limit is checked against
    pub size_bytes: u64,
    pub data: Bytes,
}

impl PendingPayload {
    /// Build a payload whose declared size is the length of `data`.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: data.len() as u64,
            data,
        }
    }
}

/// One slot of an ordered image list.
#[derive(Debug, Clone)]
pub enum ImageEntry {
    /// Already persisted; `id` is the blob URL
    Reference { id: String },
    /// Not yet persisted
    Pending { id: PendingId, payload: PendingPayload },
}

impl ImageEntry {
    pub fn reference(id: impl Into<String>) -> Self {
        ImageEntry::Reference { id: id.into() }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageEntry::Pending { .. })
    }

    pub fn reference_id(&self) -> Option<&str> {
        match self {
            ImageEntry::Reference { id } => Some(id),
            ImageEntry::Pending { .. } => None,
        }
    }

    pub fn pending_id(&self) -> Option<PendingId> {
        match self {
            ImageEntry::Pending { id, .. } => Some(*id),
            ImageEntry::Reference { .. } => None,
        }
    }
}

// References compare by id value, pending entries by identity only.
impl PartialEq for ImageEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ImageEntry::Reference { id: a }, ImageEntry::Reference { id: b }) => a == b,
            (ImageEntry::Pending { id: a, .. }, ImageEntry::Pending { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for ImageEntry {}
