// Snapshot, network rate and build identity models

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Sentinel for `Snapshot::disk_percent` when the mount could not be read.
pub const DISK_UNKNOWN: f64 = -1.0;

/// Sub-metrics that may degrade to a sentinel instead of failing the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Memory,
    Swap,
    Load,
    Uptime,
    Disk,
    Network,
}

/// Build identity injected once at process start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildIdentity {
    pub hash: String,
    pub deployed_at: String,
}

/// Throughput of the primary interface, bytes per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRate {
    pub iface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
    pub rx_per_sec: f64,
    pub tx_per_sec: f64,
}

/// One point-in-time bundle of host metrics. Built only by the assembler and
/// shared behind an `Arc`; a newer snapshot replaces it, nothing edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub uptime_seconds: u64,
    /// 1, 5 and 15 minute load averages.
    pub load_averages: [f64; 3],
    /// Unrounded; rounding happens at presentation.
    pub cpu_percent: f64,
    pub cores: u32,
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_total_bytes: u64,
    /// Percent in [0, 100], or [`DISK_UNKNOWN`].
    pub disk_percent: f64,
    pub network: NetworkRate,
    pub build: BuildIdentity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<Metric>,
}

impl Snapshot {
    pub fn mem_percent(&self) -> f64 {
        ratio_percent(self.mem_used_bytes, self.mem_total_bytes)
    }

    pub fn swap_percent(&self) -> f64 {
        ratio_percent(self.swap_used_bytes, self.swap_total_bytes)
    }

    pub fn disk_known(&self) -> bool {
        self.disk_percent >= 0.0
    }

    pub fn is_degraded(&self, metric: Metric) -> bool {
        self.degraded.contains(&metric)
    }
}

fn ratio_percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// The live cache value: a snapshot plus when it was captured (unix millis).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub snapshot: Arc<Snapshot>,
    pub captured_at_millis: u64,
}
