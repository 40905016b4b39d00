// Snapshot collector: assembler + cache behind one handle shared by the
// refresh scheduler (writer) and HTTP handlers (readers).

pub mod assembler;
pub mod cache;
pub mod counters;
pub mod cpu;
pub mod iface;

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CollectorError, CollectorResult};
use crate::models::{CacheEntry, Snapshot};
pub use assembler::{AssemblerConfig, SnapshotAssembler, SnapshotSource};
pub use cache::SnapshotCache;

/// Wall-clock unix millis; 0 if the clock is before the epoch.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

pub struct Collector {
    source: Arc<dyn SnapshotSource>,
    cache: Arc<SnapshotCache>,
    /// Serializes assemblies: scheduler cycles and the empty-cache fill never overlap.
    /// The guard travels with the blocking task, so a dropped caller cannot release it early.
    assemble_gate: Arc<Mutex<()>>,
}

impl Collector {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            cache: Arc::new(SnapshotCache::new()),
            assemble_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Current snapshot without computing anything.
    pub fn cached(&self) -> Option<Arc<Snapshot>> {
        self.cache.load().map(|e| e.snapshot.clone())
    }

    pub fn is_populated(&self) -> bool {
        self.cache.is_populated()
    }

    pub fn cache_entry(&self) -> Option<Arc<CacheEntry>> {
        self.cache.load()
    }

    /// Cached snapshot regardless of age. Only an empty cache computes, and
    /// concurrent callers then share a single assembly.
    pub async fn get_or_compute(&self) -> CollectorResult<Arc<Snapshot>> {
        if let Some(entry) = self.cache.load() {
            return Ok(entry.snapshot.clone());
        }
        let gate = self.assemble_gate.clone().lock_owned().await;
        if let Some(entry) = self.cache.load() {
            return Ok(entry.snapshot.clone());
        }
        tracing::debug!(operation = "get_or_compute", "cache empty, assembling inline");
        let entry = self.assemble_and_install(gate).await?;
        Ok(entry.snapshot.clone())
    }

    /// Scheduler path: assemble and install. On failure the previous snapshot stays.
    pub async fn refresh(&self) -> CollectorResult<Arc<Snapshot>> {
        let gate = self.assemble_gate.clone().lock_owned().await;
        let entry = self.assemble_and_install(gate).await?;
        Ok(entry.snapshot.clone())
    }

    /// Assembly and install both run inside the blocking task. If the caller is
    /// dropped mid-way the snapshot still lands and the gate opens only afterwards.
    async fn assemble_and_install(
        &self,
        gate: OwnedMutexGuard<()>,
    ) -> CollectorResult<Arc<CacheEntry>> {
        let source = self.source.clone();
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || -> CollectorResult<Arc<CacheEntry>> {
            let _gate = gate;
            let snapshot = source.assemble().map_err(CollectorError::Transient)?;
            Ok(cache.install(snapshot, now_millis()))
        })
        .await?
    }
}
