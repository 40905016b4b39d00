// Latest-snapshot cache: lock-free reads, whole-value swaps on install

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::models::{CacheEntry, Snapshot};

/// Empty until the first install, Populated forever after.
#[derive(Default)]
pub struct SnapshotCache {
    current: ArcSwapOption<CacheEntry>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Option<Arc<CacheEntry>> {
        self.current.load_full()
    }

    pub fn is_populated(&self) -> bool {
        self.current.load().is_some()
    }

    /// Readers holding the previous entry keep it; new readers see this one.
    pub fn install(&self, snapshot: Snapshot, captured_at_millis: u64) -> Arc<CacheEntry> {
        let entry = Arc::new(CacheEntry {
            snapshot: Arc::new(snapshot),
            captured_at_millis,
        });
        self.current.store(Some(entry.clone()));
        entry
    }
}
