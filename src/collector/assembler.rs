// Snapshot assembly: one pass over the host, degrading per sub-metric

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::counters::RateComputer;
use super::cpu::{CpuSampler, DEFAULT_CPU_WINDOW};
use super::iface::select_primary;
use crate::host::{HostSource, MemoryUsage};
use crate::models::{BuildIdentity, DISK_UNKNOWN, Metric, NetworkRate, Snapshot};

/// Interface name reported when no interface can be read.
pub const DEFAULT_INTERFACE: &str = "eth0";

/// Anything that can produce a fresh snapshot. The cache and scheduler only see this.
pub trait SnapshotSource: Send + Sync + 'static {
    /// May block (the CPU window). Run it off the async executor.
    fn assemble(&self) -> anyhow::Result<Snapshot>;
}

#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    pub cpu_window: Duration,
    pub default_interface: String,
    pub disk_mount: String,
    pub build: BuildIdentity,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            cpu_window: DEFAULT_CPU_WINDOW,
            default_interface: DEFAULT_INTERFACE.into(),
            disk_mount: "/".into(),
            build: BuildIdentity::default(),
        }
    }
}

pub struct SnapshotAssembler {
    host: Arc<dyn HostSource>,
    cpu: CpuSampler,
    rates: Mutex<RateComputer>,
    /// Origin of counter timestamps; wall-clock steps never reach rate math.
    started: Instant,
    default_interface: String,
    disk_mount: String,
    build: BuildIdentity,
}

impl SnapshotAssembler {
    pub fn new(host: Arc<dyn HostSource>, config: AssemblerConfig) -> Self {
        Self {
            host,
            cpu: CpuSampler::new(config.cpu_window),
            rates: Mutex::new(RateComputer::new()),
            started: Instant::now(),
            default_interface: config.default_interface,
            disk_mount: config.disk_mount,
            build: config.build,
        }
    }

    fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn network(&self, degraded: &mut Vec<Metric>) -> NetworkRate {
        let mut rates = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        let observed_at = self.elapsed_millis();
        let interfaces = match self.host.interfaces() {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!(error = %e, operation = "interfaces", "interface read failed");
                Vec::new()
            }
        };
        match select_primary(&interfaces) {
            Some(primary) => {
                let r = rates.observe(
                    &primary.name,
                    primary.rx_bytes_total,
                    primary.tx_bytes_total,
                    observed_at,
                );
                NetworkRate {
                    iface: primary.name.clone(),
                    ip: primary.preferred_ipv4(),
                    rx_per_sec: r.rx_per_sec,
                    tx_per_sec: r.tx_per_sec,
                }
            }
            None => {
                degraded.push(Metric::Network);
                rates.reset_primary();
                NetworkRate {
                    iface: self.default_interface.clone(),
                    ip: None,
                    rx_per_sec: 0.0,
                    tx_per_sec: 0.0,
                }
            }
        }
    }
}

fn or_degraded<T>(
    result: anyhow::Result<T>,
    metric: Metric,
    fallback: T,
    degraded: &mut Vec<Metric>,
) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, metric = ?metric, "degraded reading");
            degraded.push(metric);
            fallback
        }
    }
}

impl SnapshotSource for SnapshotAssembler {
    /// Fails only when every core reading (CPU, memory, load, uptime, network)
    /// is unavailable; anything less degrades to sentinels.
    fn assemble(&self) -> anyhow::Result<Snapshot> {
        let mut degraded = Vec::new();

        let memory = or_degraded(
            self.host.memory(),
            Metric::Memory,
            MemoryUsage::default(),
            &mut degraded,
        );
        let swap = or_degraded(
            self.host.swap(),
            Metric::Swap,
            MemoryUsage::default(),
            &mut degraded,
        );
        let load_averages = or_degraded(
            self.host.load_average(),
            Metric::Load,
            [0.0; 3],
            &mut degraded,
        );
        let uptime_seconds = or_degraded(
            self.host.uptime_secs(),
            Metric::Uptime,
            0,
            &mut degraded,
        );
        let disk_percent = or_degraded(
            self.host.disk_usage_percent(&self.disk_mount),
            Metric::Disk,
            DISK_UNKNOWN,
            &mut degraded,
        );

        let cpu = self.cpu.sample(self.host.as_ref());
        if cpu.degraded {
            degraded.push(Metric::Cpu);
        }

        let network = self.network(&mut degraded);

        let essentials = [
            Metric::Cpu,
            Metric::Memory,
            Metric::Load,
            Metric::Uptime,
            Metric::Network,
        ];
        anyhow::ensure!(
            !essentials.iter().all(|m| degraded.contains(m)),
            "host interface unavailable: no metric could be read"
        );

        let cores = u32::try_from(self.host.core_count())
            .unwrap_or(u32::MAX)
            .max(1);

        Ok(Snapshot {
            uptime_seconds,
            load_averages,
            cpu_percent: cpu.percent.clamp(0.0, 100.0),
            cores,
            mem_used_bytes: memory.used.min(memory.total),
            mem_total_bytes: memory.total,
            swap_used_bytes: swap.used.min(swap.total),
            swap_total_bytes: swap.total,
            disk_percent,
            network,
            build: self.build.clone(),
            degraded,
        })
    }
}
