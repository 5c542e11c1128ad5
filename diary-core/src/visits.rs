//! Visit tracking.
//!
//! [`VisitTracker`] is the in-memory authority for how often each
//! memory node has been opened. It is rebuilt from the injected
//! [`ProgressStore`] at startup and writes back after every mutation,
//! so the persisted record never lags the session by more than nothing.

use crate::persist::ProgressStore;
use crate::story::is_memory_id;
use std::collections::BTreeMap;
use tracing::warn;

/// Authoritative map of memory-node id to visit count.
pub struct VisitTracker {
    counts: BTreeMap<String, u32>,
    store: Box<dyn ProgressStore>,
}

impl VisitTracker {
    /// Rebuild the tracker from a store.
    ///
    /// A malformed record is recovered as empty rather than surfaced:
    /// losing history beats refusing to start.
    pub fn load(store: Box<dyn ProgressStore>) -> Self {
        let counts = match store.load() {
            Ok(entries) => entries.into_iter().collect(),
            Err(e) => {
                warn!("ignoring malformed progress record: {e}");
                BTreeMap::new()
            }
        };
        Self { counts, store }
    }

    /// Record that a node was opened.
    ///
    /// No-op for non-memory ids. The store is updated before this
    /// returns; a write failure is logged and the in-memory count kept.
    pub fn record_visit(&mut self, id: &str) {
        if !is_memory_id(id) {
            return;
        }
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
        self.persist();
    }

    /// Visit count for `id`; 0 for unvisited or non-memory ids.
    pub fn count_of(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Number of distinct memory nodes visited at least once.
    pub fn visited_count(&self) -> usize {
        self.counts.values().filter(|&&c| c > 0).count()
    }

    /// True before any visit has ever been recorded.
    pub fn is_first_load(&self) -> bool {
        self.visited_count() == 0
    }

    /// All counts, ordered by id.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, &c)| (id.as_str(), c))
    }

    /// Clear all counts and the persisted record. Idempotent.
    pub fn reset(&mut self) {
        self.counts.clear();
        if let Err(e) = self.store.clear() {
            warn!("failed to clear persisted progress: {e}");
        }
    }

    fn persist(&mut self) {
        let entries: Vec<(String, u32)> = self
            .counts
            .iter()
            .map(|(id, &c)| (id.clone(), c))
            .collect();
        if let Err(e) = self.store.save(&entries) {
            warn!("failed to persist progress: {e}");
        }
    }
}

impl std::fmt::Debug for VisitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitTracker")
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}
