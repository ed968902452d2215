//! Save pipeline for one edit session.
//!
//! A save validates the form, uploads the new thumbnail and every pending detail
//! image, resolves the ordered image list against the upload results and writes
//! the whole record in one upsert. Until that write succeeds the session is left
//! untouched, so pressing save again re-runs everything.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use folio_core::constants::{details_path_hint, thumbnail_path_hint, PORTFOLIOS_COLLECTION};
use folio_core::validation::missing_required_fields;
use folio_core::{generate_entity_id, ErrorMetadata, LogLevel, PortfolioRecord, RequiredFields};
use folio_storage::{BlobStore, DocumentStore, StorageError};
use tokio::sync::watch;

use crate::error::SubmitError;
use crate::session::EditSession;
use crate::uploads::{upload_details, upload_one};

/// Where a save attempt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Validating,
    UploadingThumbnail,
    UploadingDetails,
    Resolving,
    Persisting,
    /// The last attempt failed; a new one may start
    Failed,
}

impl SaveState {
    pub fn is_in_flight(&self) -> bool {
        !matches!(self, SaveState::Idle | SaveState::Failed)
    }
}

impl Display for SaveState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            SaveState::Idle => "idle",
            SaveState::Validating => "validating",
            SaveState::UploadingThumbnail => "uploading_thumbnail",
            SaveState::UploadingDetails => "uploading_details",
            SaveState::Resolving => "resolving",
            SaveState::Persisting => "persisting",
            SaveState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Returns the coordinator to `Idle` if a save future is dropped mid-flight.
struct InFlight<'a> {
    state: &'a watch::Sender<SaveState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                *state = SaveState::Idle;
                true
            } else {
                false
            }
        });
    }
}

/// Turns an edit session into one persisted portfolio record.
///
/// Shareable behind an `Arc`; only one save runs at a time.
pub struct SubmissionCoordinator {
    blobs: Arc<dyn BlobStore>,
    documents: Arc<dyn DocumentStore>,
    required: RequiredFields,
    state: watch::Sender<SaveState>,
}

impl SubmissionCoordinator {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        documents: Arc<dyn DocumentStore>,
        required: RequiredFields,
    ) -> Self {
        let (state, _) = watch::channel(SaveState::Idle);
        Self {
            blobs,
            documents,
            required,
            state,
        }
    }

    pub fn state(&self) -> SaveState {
        *self.state.borrow()
    }

    /// Follow state changes, e.g. to disable the save button while busy.
    pub fn subscribe_state(&self) -> watch::Receiver<SaveState> {
        self.state.subscribe()
    }

    /// Save the session.
    ///
    /// On success the session's images and thumbnail are cleared and the saved
    /// record is returned. On failure the session is unchanged; blobs uploaded by
    /// the failed attempt are logged and listed on the error.
    pub async fn submit(&self, session: &mut EditSession) -> Result<PortfolioRecord, SubmitError> {
        let started = self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                false
            } else {
                *state = SaveState::Validating;
                true
            }
        });
        if !started {
            tracing::debug!("Save rejected: another save is in progress");
            return Err(SubmitError::Busy);
        }
        let _in_flight = InFlight { state: &self.state };

        let start = Instant::now();
        let mut uploaded = Vec::new();
        let result = self.run(session, &mut uploaded).await;

        match &result {
            Ok(record) => {
                session.clear_images();
                self.state.send_replace(SaveState::Idle);
                tracing::info!(
                    id = %record.id,
                    images = record.images.len(),
                    uploaded = uploaded.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Portfolio saved"
                );
            }
            Err(e) => {
                // A rejected form never left validation
                let next = match e {
                    SubmitError::Validation { .. } => SaveState::Idle,
                    _ => SaveState::Failed,
                };
                self.state.send_replace(next);
                log_failure(e);
                for path in &uploaded {
                    tracing::warn!(
                        path = %path,
                        error_code = e.error_code(),
                        "Orphaned blob left by failed save"
                    );
                }
            }
        }
        result
    }

    fn enter(&self, state: SaveState) {
        tracing::debug!(state = %state, "Save state changed");
        self.state.send_replace(state);
    }

    async fn run(
        &self,
        session: &EditSession,
        uploaded: &mut Vec<String>,
    ) -> Result<PortfolioRecord, SubmitError> {
        // Validating: no I/O before the form is complete
        let mut missing = missing_required_fields(&session.draft, self.required);
        if session.thumbnail.is_empty() {
            missing.push("thumbnail");
        }
        if !missing.is_empty() {
            return Err(SubmitError::Validation { fields: missing });
        }

        let id = match session.original() {
            Some(record) => record.id.clone(),
            None => generate_entity_id(&session.draft.english_title, Utc::now()),
        };

        let mut thumbnail_url = None;
        if let Some(payload) = session.thumbnail.pending() {
            self.enter(SaveState::UploadingThumbnail);
            let blob = upload_one(self.blobs.as_ref(), &thumbnail_path_hint(&id), payload)
                .await
                .map_err(|cause| SubmitError::Upload {
                    cause,
                    orphaned: Vec::new(),
                })?;
            uploaded.push(blob.path);
            thumbnail_url = Some(blob.url);
        }

        self.enter(SaveState::UploadingDetails);
        let details = upload_details(
            self.blobs.as_ref(),
            &details_path_hint(&id),
            session.images.all_pending(),
        )
        .await;
        uploaded.extend(details.uploaded);
        if let Some(cause) = details.first_error {
            return Err(SubmitError::Upload {
                cause,
                orphaned: uploaded.clone(),
            });
        }

        self.enter(SaveState::Resolving);
        let images = session
            .images
            .resolve_keyed(details.urls)
            .map_err(|e| SubmitError::InvariantViolation {
                reason: e.to_string(),
                orphaned: uploaded.clone(),
            })?;
        let thumbnail = session.thumbnail.resolve(thumbnail_url).ok_or_else(|| {
            SubmitError::InvariantViolation {
                reason: "thumbnail missing after validation".to_string(),
                orphaned: uploaded.clone(),
            }
        })?;

        self.enter(SaveState::Persisting);
        let today = Utc::now().date_naive();
        let record = session
            .draft
            .to_record(id, thumbnail, images, session.original(), today);
        let document = record.to_record().map_err(|e| SubmitError::Persistence {
            cause: StorageError::Serialization(e),
            orphaned: uploaded.clone(),
        })?;

        self.documents
            .put(PORTFOLIOS_COLLECTION, &record.id, document)
            .await
            .map_err(|cause| SubmitError::Persistence {
                cause,
                orphaned: uploaded.clone(),
            })?;

        Ok(record)
    }
}

fn log_failure(e: &SubmitError) {
    match e.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %e, error_code = e.error_code(), "Save failed")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %e, error_code = e.error_code(), "Save failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %e, error_code = e.error_code(), "Save failed")
        }
    }
}
