// Background refresh scheduler: the only writer of the snapshot cache.
// One cycle at a time; a slow cycle delays the next tick instead of overlapping it.

use crate::collector::Collector;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Scheduler timing and logging config.
pub struct SchedulerConfig {
    pub refresh_interval: Duration,
    /// How often to log refresh counters at INFO level.
    pub stats_log_interval: Duration,
}

/// Spawns the refresh loop. The first tick fires immediately, so the cache is
/// filled right after start; afterwards it re-arms every `refresh_interval`.
pub fn spawn(
    collector: Arc<Collector>,
    config: SchedulerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let SchedulerConfig {
        refresh_interval,
        stats_log_interval,
    } = config;

    let refresh_interval_ms = refresh_interval.as_millis() as u64;
    let scheduler_span = tracing::span!(tracing::Level::DEBUG, "scheduler", refresh_interval_ms);

    tokio::spawn(async move {
        let mut tick = interval(refresh_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first stats tick is immediate; skip it so counters are not logged as zero.
        stats_log_tick.tick().await;

        let mut refreshes_total: u64 = 0;
        let mut refresh_failures_total: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match collector.refresh().await {
                        Ok(snapshot) => {
                            refreshes_total += 1;
                            tracing::debug!(
                                operation = "refresh",
                                cpu_percent = snapshot.cpu_percent,
                                iface = %snapshot.network.iface,
                                degraded = snapshot.degraded.len(),
                                "Snapshot refreshed"
                            );
                        }
                        Err(e) => {
                            refresh_failures_total += 1;
                            tracing::warn!(
                                error = %e,
                                operation = "refresh",
                                "Snapshot refresh failed; keeping previous snapshot"
                            );
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Scheduler shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        refreshes_total,
                        refresh_failures_total,
                        cache_populated = collector.is_populated(),
                        "collector stats"
                    );
                }
            }
        }
    }
    .instrument(scheduler_span))
}
