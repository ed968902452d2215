//! Shared fixtures and scripted storage backends for admin integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use folio_admin::EditSession;
use folio_core::{PendingPayload, PortfolioRecord, Record};
use folio_storage::{
    BlobStore, DocumentStore, MemoryDocumentStore, MemoryStorage, StorageBackend, StorageError,
    StorageResult, StoredBlob, Subscription,
};
use tokio::sync::Semaphore;

pub fn payload(name: &str) -> PendingPayload {
    PendingPayload::new(name, "image/jpeg", Bytes::from(name.as_bytes().to_vec()))
}

/// A create session with every required field and a new thumbnail.
pub fn filled_session() -> EditSession {
    let mut session = EditSession::create();
    fill_draft(&mut session);
    session
        .thumbnail
        .choose(session.images.limits(), payload("thumb.jpg"))
        .unwrap();
    session
}

pub fn fill_draft(session: &mut EditSession) {
    session.draft.english_title = "PUMDT Identity".to_string();
    session.draft.korean_description = "브랜드 디자인".to_string();
    session.draft.project = "Brand identity".to_string();
    session.draft.client = "PUMDT".to_string();
    session.draft.date = "2022.02".to_string();
    session.draft.category = "design".to_string();
}

/// A stored record with two existing detail images.
pub fn stored_portfolio() -> PortfolioRecord {
    let record: Record = serde_json::from_value(serde_json::json!({
        "id": "pumdtidentity_1644000000000",
        "title": "PUMDT Identity",
        "englishTitle": "PUMDT Identity",
        "description": "브랜드 디자인",
        "koreanDescription": "브랜드 디자인",
        "project": "Brand identity",
        "client": "PUMDT",
        "date": "2022.02",
        "category": "design",
        "thumbnail": "https://cdn.example/t.jpg",
        "images": ["https://cdn.example/r1.jpg", "https://cdn.example/r2.jpg"],
        "createdAt": "2022-02-04",
        "updatedAt": "2022-02-04",
        "featured": true
    }))
    .unwrap();
    PortfolioRecord::from_record(record).unwrap()
}

/// File name at the end of a blob URL or path, without the time and random prefix.
pub fn original_name(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    file.splitn(3, '_').nth(2).unwrap_or(file)
}

/// Blob store over `MemoryStorage` whose uploads can be failed, delayed or held.
pub struct ScriptedBlobStore {
    inner: MemoryStorage,
    failing: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    gate: Option<Arc<Semaphore>>,
    uploads_started: AtomicUsize,
}

impl ScriptedBlobStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            failing: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            gate: None,
            uploads_started: AtomicUsize::new(0),
        }
    }

    /// Every upload waits for a permit on the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let store = Self {
            gate: Some(gate.clone()),
            ..Self::new()
        };
        (store, gate)
    }

    pub fn fail_on(&self, filename: &str) {
        self.failing.lock().unwrap().insert(filename.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn delay(&self, filename: &str, millis: u64) {
        self.delays
            .lock()
            .unwrap()
            .insert(filename.to_string(), Duration::from_millis(millis));
    }

    pub fn uploads_started(&self) -> usize {
        self.uploads_started.load(Ordering::SeqCst)
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for ScriptedBlobStore {
    async fn upload(
        &self,
        path_hint: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredBlob> {
        self.uploads_started.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        let delay = self.delays.lock().unwrap().get(filename).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(filename) {
            return Err(StorageError::UploadFailed(format!("scripted failure for {}", filename)));
        }

        self.inner.upload(path_hint, filename, content_type, data).await
    }

    async fn download(&self, path: &str) -> StorageResult<Bytes> {
        self.inner.download(path).await
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        self.inner.path_for_url(url)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Document store over `MemoryDocumentStore` whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyDocumentStore {
    inner: MemoryDocumentStore,
    fail_writes: AtomicBool,
}

impl FlakyDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn get_all(&self, collection: &str) -> StorageResult<Vec<Record>> {
        self.inner.get_all(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Record>> {
        self.inner.get(collection, id).await
    }

    async fn put(&self, collection: &str, id: &str, record: Record) -> StorageResult<Record> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("scripted write failure".to_string()));
        }
        self.inner.put(collection, id, record).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        self.inner.delete(collection, id).await
    }

    async fn subscribe(&self, collection: &str) -> StorageResult<Subscription> {
        self.inner.subscribe(collection).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
