//! Upload fan-out for the pending images of one save.
//!
//! Each result is tied to the `PendingId` it was dispatched for, so completion
//! order never affects where an uploaded image lands.

use std::collections::HashMap;
use std::time::Instant;

use folio_core::{PendingId, PendingPayload};
use folio_storage::{BlobStore, StorageError, StoredBlob};
use futures::future::join_all;

/// What a detail batch produced.
#[derive(Debug, Default)]
pub(crate) struct DetailUploads {
    pub urls: HashMap<PendingId, String>,
    /// Paths of every blob that did upload, in request order
    pub uploaded: Vec<String>,
    /// First failure in request order
    pub first_error: Option<StorageError>,
}

pub(crate) async fn upload_one(
    blobs: &dyn BlobStore,
    path_hint: &str,
    payload: &PendingPayload,
) -> Result<StoredBlob, StorageError> {
    let start = Instant::now();
    let blob = blobs
        .upload(path_hint, &payload.name, &payload.mime_type, payload.data.clone())
        .await?;

    tracing::info!(
        name = %payload.name,
        path = %blob.path,
        size_bytes = payload.size_bytes,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Image uploaded"
    );
    Ok(blob)
}

/// Upload every payload concurrently and wait for all of them.
///
/// Every upload runs to completion even when another fails, so the blobs that
/// did land are known and can be reported.
pub(crate) async fn upload_details(
    blobs: &dyn BlobStore,
    path_hint: &str,
    pending: Vec<(PendingId, &PendingPayload)>,
) -> DetailUploads {
    let requests = pending.into_iter().map(move |(id, payload)| async move {
        (id, payload, upload_one(blobs, path_hint, payload).await)
    });

    let mut outcome = DetailUploads::default();
    for (id, payload, result) in join_all(requests).await {
        match result {
            Ok(blob) => {
                outcome.uploaded.push(blob.path);
                outcome.urls.insert(id, blob.url);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    name = %payload.name,
                    pending_id = %id,
                    "Image upload failed"
                );
                if outcome.first_error.is_none() {
                    outcome.first_error = Some(e);
                }
            }
        }
    }
    outcome
}
