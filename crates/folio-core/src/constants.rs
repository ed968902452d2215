//! Shared constants.

/// Largest image accepted into a session: 5 MiB.
pub const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Every accepted image MIME type starts with this prefix.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Document collection holding portfolio records.
pub const PORTFOLIOS_COLLECTION: &str = "portfolios";

/// Number of title characters kept when deriving a new entity id.
pub const ENTITY_ID_SLUG_MAX_CHARS: usize = 20;

/// Blob path hint for an entity's thumbnail.
pub fn thumbnail_path_hint(entity_id: &str) -> String {
    format!("{}/{}/thumbnails", PORTFOLIOS_COLLECTION, entity_id)
}

/// Blob path hint for an entity's detail images.
pub fn details_path_hint(entity_id: &str) -> String {
    format!("{}/{}/details", PORTFOLIOS_COLLECTION, entity_id)
}
