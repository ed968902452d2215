//! Shared path generation for blob backends.
//!
//! Path format: `{path_hint}/{unix_millis}_{random}_{stem}.{ext}`.

use crate::traits::{StorageError, StorageResult};

/// Length of the random component of a blob file name.
const RANDOM_LEN: usize = 13;

/// Generate a fresh blob path inside `path_hint` for an uploaded file.
pub fn generate_blob_path(path_hint: &str, filename: &str) -> StorageResult<String> {
    let hint = path_hint.trim_matches('/');
    validate_key(hint)?;

    let millis = chrono::Utc::now().timestamp_millis();
    let random: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(RANDOM_LEN)
        .collect();

    Ok(format!("{}/{}_{}_{}", hint, millis, random, sanitize_filename(filename)))
}

/// Keep the stem and extension of a file name, safe for any backend.
pub fn sanitize_filename(filename: &str) -> String {
    // Only the last path component counts
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let clean = |part: &str| -> String {
        part.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };

    let stem = match clean(stem) {
        s if s.is_empty() => "image".to_string(),
        s => s,
    };
    match ext {
        Some(ext) => format!("{}.{}", stem, clean(ext).to_lowercase()),
        None => stem,
    }
}

/// Reject keys that could escape the store's namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Reject collection names and record ids that are not a single path segment.
pub fn validate_segment(segment: &str) -> StorageResult<()> {
    validate_key(segment)?;
    if segment.contains('/') || segment.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "'{}' must be a single path segment",
            segment
        )));
    }
    Ok(())
}
