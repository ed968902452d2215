//! Ordered image list of one edit session.
//!
//! Persisted images (references) and freshly selected files (pending) live in one
//! tagged sequence from the start, so reordering works across both kinds: a new
//! image moved above an existing one stays there when the list is resolved.
//!
//! The sequence is the single source of truth. Positions are always `0..len`;
//! every mutation keeps them contiguous.

use std::collections::HashMap;

use crate::error::ImageSetError;
use crate::models::{ImageEntry, PendingId, PendingPayload};
use crate::validation::validate_batch;

pub use crate::validation::ImageLimits;

#[derive(Debug, Clone, Default)]
pub struct OrderedImageSet {
    entries: Vec<ImageEntry>,
    limits: ImageLimits,
    next_pending: u64,
}

impl OrderedImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ImageLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &ImageLimits {
        &self.limits
    }

    /// Replace everything with references, in the given order.
    pub fn set_existing<I, S>(&mut self, refs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = refs.into_iter().map(ImageEntry::reference).collect();
        tracing::debug!(count = self.entries.len(), "Image set loaded existing references");
    }

    /// Append a batch of new files after every current entry.
    ///
    /// All or nothing: if any file fails validation none of the batch is added and
    /// the error names that file and the limit it broke.
    pub fn add_pending(
        &mut self,
        payloads: Vec<PendingPayload>,
    ) -> Result<Vec<PendingId>, ImageSetError> {
        validate_batch(&self.limits, &payloads)?;

        let mut ids = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let id = PendingId(self.next_pending);
            self.next_pending += 1;
            self.entries.push(ImageEntry::Pending { id, payload });
            ids.push(id);
        }

        tracing::debug!(
            added = ids.len(),
            total = self.entries.len(),
            "Image set accepted pending images"
        );
        Ok(ids)
    }

    /// Remove the entry at `index`; out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// Swap `index` with the entry above it; no-op at 0 or out of range.
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.entries.len() {
            self.entries.swap(index, index - 1);
        }
    }

    /// Swap `index` with the entry below it; no-op at the end or out of range.
    pub fn move_down(&mut self, index: usize) {
        if index < self.entries.len().saturating_sub(1) {
            self.entries.swap(index, index + 1);
        }
    }

    /// Pending payloads in current order, with their identities.
    ///
    /// This is the order uploads must be issued in and results fed back in.
    pub fn all_pending(&self) -> Vec<(PendingId, &PendingPayload)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ImageEntry::Pending { id, payload } => Some((*id, payload)),
                ImageEntry::Reference { .. } => None,
            })
            .collect()
    }

    /// Reference ids in current order.
    pub fn all_reference_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.reference_id().map(str::to_string))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    /// Final ordered references, given upload results in `all_pending()` order.
    ///
    /// Every pending slot takes its result in place; references stay put. The set
    /// itself is not changed, so a failed save can be retried.
    pub fn resolve(&self, upload_results: Vec<String>) -> Result<Vec<String>, ImageSetError> {
        let pending: Vec<PendingId> = self.all_pending().into_iter().map(|(id, _)| id).collect();
        if pending.len() != upload_results.len() {
            return Err(ImageSetError::ResultCountMismatch {
                expected: pending.len(),
                actual: upload_results.len(),
            });
        }

        self.resolve_keyed(pending.into_iter().zip(upload_results).collect())
    }

    /// Same as [`resolve`](Self::resolve), with results correlated by identity.
    pub fn resolve_keyed(
        &self,
        mut upload_results: HashMap<PendingId, String>,
    ) -> Result<Vec<String>, ImageSetError> {
        let expected = self.pending_count();
        if upload_results.len() != expected {
            return Err(ImageSetError::ResultCountMismatch {
                expected,
                actual: upload_results.len(),
            });
        }

        self.entries
            .iter()
            .map(|entry| match entry {
                ImageEntry::Reference { id } => Ok(id.clone()),
                ImageEntry::Pending { id, .. } => upload_results
                    .remove(id)
                    .ok_or(ImageSetError::MissingResult(*id)),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectReason;

    fn png(name: &str, size: usize) -> PendingPayload {
        PendingPayload::new(name, "image/png", vec![7u8; size])
    }

    fn refs(ids: &[&str]) -> OrderedImageSet {
        let mut set = OrderedImageSet::new();
        set.set_existing(ids.iter().copied());
        set
    }

    /// Compact view of the order: reference ids, or `*name` for pending files.
    fn order(set: &OrderedImageSet) -> Vec<String> {
        set.entries()
            .iter()
            .map(|entry| match entry {
                ImageEntry::Reference { id } => id.clone(),
                ImageEntry::Pending { payload, .. } => format!("*{}", payload.name),
            })
            .collect()
    }

    #[test]
    fn test_set_existing_preserves_order() {
        let ids = vec!["c", "a", "b", "a"];
        let set = refs(&ids);
        assert_eq!(set.all_reference_ids(), ids);
        assert!(refs(&[]).is_empty());
    }

    #[test]
    fn test_set_existing_replaces_pending() {
        let mut set = refs(&["u1"]);
        set.add_pending(vec![png("p", 1)]).unwrap();
        set.set_existing(vec!["u9".to_string()]);
        assert_eq!(order(&set), vec!["u9"]);
        assert_eq!(set.pending_count(), 0);
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let mut set = refs(&["a", "b", "c"]);
        set.add_pending(vec![png("p1", 1), png("p2", 1)]).unwrap();
        let original = order(&set);

        for i in 1..set.len() {
            set.move_up(i);
            set.move_down(i - 1);
            assert_eq!(order(&set), original, "index {}", i);
        }
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        for n in 0usize..4 {
            let ids: Vec<String> = (0..n).map(|i| format!("u{}", i)).collect();
            let mut set = OrderedImageSet::new();
            set.set_existing(ids.clone());

            set.move_up(0);
            assert_eq!(set.all_reference_ids(), ids);
            set.move_down(n.saturating_sub(1));
            assert_eq!(set.all_reference_ids(), ids);
            set.move_up(n + 5);
            set.move_down(n + 5);
            assert_eq!(set.all_reference_ids(), ids);
        }
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        for k in 0..4 {
            let mut set = refs(&["a", "b", "c", "d"]);
            set.remove_at(k);
            assert_eq!(set.len(), 3);
            let expected: Vec<&str> = ["a", "b", "c", "d"]
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != k)
                .map(|(_, id)| *id)
                .collect();
            assert_eq!(set.all_reference_ids(), expected);
        }
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut set = refs(&["a", "b"]);
        set.remove_at(2);
        set.remove_at(usize::MAX);
        assert_eq!(set.all_reference_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_interleaving_survives_reorder() {
        let mut set = refs(&["A", "B"]);
        set.add_pending(vec![png("p1", 10)]).unwrap();
        set.move_up(2);
        assert_eq!(order(&set), vec!["A", "*p1", "B"]);

        let resolved = set.resolve(vec!["X".to_string()]).unwrap();
        assert_eq!(resolved, vec!["A", "X", "B"]);
    }

    #[test]
    fn test_pending_moved_to_front() {
        let mut set = refs(&["u1", "u2"]);
        set.add_pending(vec![png("p1", 1), png("p2", 1)]).unwrap();
        // [u1, u2, p1, p2] -> [p2, u1, u2, p1]
        set.move_up(3);
        set.move_up(2);
        set.move_up(1);
        assert_eq!(order(&set), vec!["*p2", "u1", "u2", "*p1"]);

        let pending: Vec<&str> = set
            .all_pending()
            .into_iter()
            .map(|(_, p)| p.name.as_str())
            .collect();
        assert_eq!(pending, vec!["p2", "p1"]);

        let resolved = set
            .resolve(vec!["r2".to_string(), "r1".to_string()])
            .unwrap();
        assert_eq!(resolved, vec!["r2", "u1", "u2", "r1"]);
    }

    #[test]
    fn test_batch_rejection_is_atomic() {
        let mut set = refs(&["u1"]);
        let oversized = PendingPayload {
            size_bytes: 6 * 1024 * 1024,
            ..png("big.png", 1)
        };

        let err = set
            .add_pending(vec![png("ok.png", 1), oversized, png("also-ok.png", 1)])
            .unwrap_err();
        match err {
            ImageSetError::Rejected(rejection) => {
                assert_eq!(rejection.index, 1);
                assert_eq!(rejection.name, "big.png");
                assert!(matches!(rejection.reason, RejectReason::TooLarge { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(order(&set), vec!["u1"]);
    }

    #[test]
    fn test_non_image_rejected() {
        let mut set = OrderedImageSet::new();
        let err = set
            .add_pending(vec![PendingPayload::new("notes.txt", "text/plain", vec![1u8])])
            .unwrap_err();
        assert!(matches!(err, ImageSetError::Rejected(_)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_resolve_count_mismatch_is_fatal() {
        let mut set = refs(&["u1"]);
        set.add_pending(vec![png("p1", 1), png("p2", 1)]).unwrap();
        let before = order(&set);

        let short = set.resolve(vec!["x".to_string()]).unwrap_err();
        assert!(short.is_invariant_violation());
        assert!(matches!(
            short,
            ImageSetError::ResultCountMismatch {
                expected: 2,
                actual: 1
            }
        ));

        let long = set
            .resolve(vec!["x".into(), "y".into(), "z".into()])
            .unwrap_err();
        assert!(long.is_invariant_violation());
        assert_eq!(order(&set), before);
    }

    #[test]
    fn test_resolve_keyed_by_identity() {
        let mut set = refs(&["u1"]);
        let ids = set.add_pending(vec![png("p1", 1), png("p2", 1)]).unwrap();
        set.move_up(2);

        let mut results = HashMap::new();
        results.insert(ids[1], "r2".to_string());
        results.insert(ids[0], "r1".to_string());
        assert_eq!(set.resolve_keyed(results).unwrap(), vec!["u1", "r2", "r1"]);
    }

    #[test]
    fn test_resolve_keyed_unknown_identity() {
        let mut set = OrderedImageSet::new();
        let ids = set.add_pending(vec![png("p1", 1)]).unwrap();
        let mut other = OrderedImageSet::new();
        other.add_pending(vec![png("q", 1), png("r", 1)]).unwrap();
        let foreign = other.all_pending()[1].0;
        assert_ne!(foreign, ids[0]);

        let mut results = HashMap::new();
        results.insert(foreign, "x".to_string());
        let err = set.resolve_keyed(results).unwrap_err();
        assert!(matches!(err, ImageSetError::MissingResult(id) if id == ids[0]));
    }

    #[test]
    fn test_scenario_existing_then_pending() {
        let mut set = refs(&["u1", "u2"]);
        set.add_pending(vec![png("b1", 100)]).unwrap();

        let pending = set.all_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1.size_bytes, 100);
        assert_eq!(pending[0].1.mime_type, "image/png");
        assert_eq!(set.all_reference_ids(), vec!["u1", "u2"]);
        assert_eq!(order(&set), vec!["u1", "u2", "*b1"]);

        set.move_up(2);
        assert_eq!(order(&set), vec!["u1", "*b1", "u2"]);
        assert_eq!(
            set.resolve(vec!["u3".to_string()]).unwrap(),
            vec!["u1", "u3", "u2"]
        );
    }

    #[test]
    fn test_scenario_oversized_file_rejected() {
        let mut set = OrderedImageSet::new();
        let err = set
            .add_pending(vec![png("six.png", 6 * 1024 * 1024)])
            .unwrap_err();
        assert!(set.is_empty());
        let message = err.to_string();
        assert!(message.contains("six.png"));
        assert!(message.contains("5 MiB"));
    }

    #[test]
    fn test_scenario_remove_middle() {
        let mut set = refs(&["u1", "u2", "u3"]);
        set.remove_at(1);
        assert_eq!(set.all_reference_ids(), vec!["u1", "u3"]);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut set = refs(&["u1"]);
        let first = set.add_pending(vec![png("p", 1)]).unwrap();
        set.clear();
        assert!(set.is_empty());
        let second = set.add_pending(vec![png("p", 1)]).unwrap();
        assert_ne!(first, second);
        assert_eq!(set.resolve(vec!["x".to_string()]).unwrap(), vec!["x"]);
    }
}
