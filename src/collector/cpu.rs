// CPU utilization from two time-spaced per-core tick readings

use crate::host::{CoreTicks, HostSource};
use std::time::Duration;

pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuReading {
    /// Mean per-core busy fraction x 100, unrounded, in [0, 100].
    pub percent: f64,
    pub degraded: bool,
}

impl CpuReading {
    fn degraded() -> Self {
        Self {
            percent: 0.0,
            degraded: true,
        }
    }
}

pub struct CpuSampler {
    window: Duration,
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WINDOW)
    }
}

impl CpuSampler {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Blocks the calling thread for the whole window. Only the refresh cycle
    /// (or the one-time empty-cache fill) may call this.
    pub fn sample(&self, host: &dyn HostSource) -> CpuReading {
        let before = match host.cpu_ticks() {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                tracing::debug!(operation = "cpu_ticks", "host reports zero cores");
                return CpuReading::degraded();
            }
            Err(e) => {
                tracing::debug!(error = %e, operation = "cpu_ticks", "CPU tick read failed");
                return CpuReading::degraded();
            }
        };
        std::thread::sleep(self.window);
        let after = match host.cpu_ticks() {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(error = %e, operation = "cpu_ticks", "CPU tick read failed");
                return CpuReading::degraded();
            }
        };
        match busy_percent(&before, &after) {
            Some(percent) => CpuReading {
                percent,
                degraded: false,
            },
            None => CpuReading::degraded(),
        }
    }
}

/// Arithmetic mean of per-core busy fractions, x 100. A core whose total did
/// not advance counts as idle. `None` when either reading has no cores.
pub fn busy_percent(before: &[CoreTicks], after: &[CoreTicks]) -> Option<f64> {
    let cores = before.len().min(after.len());
    if cores == 0 {
        return None;
    }
    let sum: f64 = before
        .iter()
        .zip(after)
        .map(|(a, b)| {
            let d_total = b.total.saturating_sub(a.total);
            if d_total == 0 {
                return 0.0;
            }
            let d_idle = b.idle.saturating_sub(a.idle).min(d_total);
            1.0 - d_idle as f64 / d_total as f64
        })
        .sum();
    Some((sum / cores as f64 * 100.0).clamp(0.0, 100.0))
}
