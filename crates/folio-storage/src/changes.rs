//! Change notification fan-out shared by the document store backends.

use std::collections::HashMap;

use folio_core::Record;
use tokio::sync::{broadcast, Mutex};

/// Snapshots buffered per subscriber before the oldest are skipped.
const SNAPSHOT_BUFFER: usize = 16;

/// Per-collection broadcast channels.
#[derive(Default)]
pub(crate) struct ChangeFeed {
    channels: Mutex<HashMap<String, broadcast::Sender<Vec<Record>>>>,
}

impl ChangeFeed {
    pub(crate) async fn subscribe(&self, collection: &str) -> Subscription {
        let mut channels = self.channels.lock().await;
        let sender = channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(SNAPSHOT_BUFFER).0);
        Subscription {
            collection: collection.to_string(),
            receiver: sender.subscribe(),
        }
    }

    /// Publish a snapshot; a collection nobody listens to is skipped.
    pub(crate) async fn publish(&self, collection: &str, snapshot: Vec<Record>) {
        let mut channels = self.channels.lock().await;
        if let Some(sender) = channels.get(collection) {
            if sender.send(snapshot).is_err() {
                // Every subscriber is gone
                channels.remove(collection);
            }
        }
    }

    pub(crate) async fn has_subscribers(&self, collection: &str) -> bool {
        self.channels
            .lock()
            .await
            .get(collection)
            .map(|sender| sender.receiver_count() > 0)
            .unwrap_or(false)
    }
}

/// Live view of one collection. Dropping it unsubscribes.
pub struct Subscription {
    collection: String,
    receiver: broadcast::Receiver<Vec<Record>>,
}

impl Subscription {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Wait for the next snapshot; `None` once the store is gone.
    ///
    /// A slow subscriber skips stale snapshots: each one is complete, so only the
    /// newest matters.
    pub async fn next(&mut self) -> Option<Vec<Record>> {
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        collection = %self.collection,
                        skipped,
                        "Subscriber lagged; skipping stale snapshots"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
