// Counter store and rate computer for per-interface byte counters

use std::collections::HashMap;

/// Bytes per second derived from two counter observations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rates {
    pub rx_per_sec: f64,
    pub tx_per_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InterfaceCounterSample {
    rx_bytes_total: u64,
    tx_bytes_total: u64,
    observed_at_millis: u64,
}

/// Last observed raw counters per interface. Baselines live in memory only;
/// a restarted process cold-starts every interface.
#[derive(Debug, Default)]
pub struct CounterStore {
    samples: HashMap<String, InterfaceCounterSample>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate since the previous observation of `iface`, then store this one as
    /// the new baseline. First observation yields zero. A counter that went
    /// backwards (reset, wraparound) yields zero for that interval, and so does
    /// a timestamp older than the baseline.
    pub fn record_and_rate(
        &mut self,
        iface: &str,
        rx_bytes_total: u64,
        tx_bytes_total: u64,
        now_millis: u64,
    ) -> Rates {
        let sample = InterfaceCounterSample {
            rx_bytes_total,
            tx_bytes_total,
            observed_at_millis: now_millis,
        };
        match self.samples.insert(iface.to_string(), sample) {
            None => Rates::default(),
            Some(prev) if now_millis < prev.observed_at_millis => Rates::default(),
            Some(prev) => {
                let dt = (now_millis - prev.observed_at_millis).max(1);
                let drx = rx_bytes_total.saturating_sub(prev.rx_bytes_total);
                let dtx = tx_bytes_total.saturating_sub(prev.tx_bytes_total);
                Rates {
                    rx_per_sec: per_sec(drx, dt),
                    tx_per_sec: per_sec(dtx, dt),
                }
            }
        }
    }

    pub fn forget(&mut self, iface: &str) {
        self.samples.remove(iface);
    }

    pub fn contains(&self, iface: &str) -> bool {
        self.samples.contains_key(iface)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn per_sec(delta: u64, dt_millis: u64) -> f64 {
    delta as f64 * 1000.0 / dt_millis as f64
}

/// Rates for the primary interface. A change of primary is a cold start for
/// the new interface even if it was observed before.
#[derive(Debug, Default)]
pub struct RateComputer {
    store: CounterStore,
    primary: Option<String>,
}

impl RateComputer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        iface: &str,
        rx_bytes_total: u64,
        tx_bytes_total: u64,
        now_millis: u64,
    ) -> Rates {
        if self.primary.as_deref() != Some(iface) {
            if let Some(old) = &self.primary {
                tracing::debug!(from = %old, to = %iface, "primary interface changed");
            }
            self.store.forget(iface);
            self.primary = Some(iface.to_string());
        }
        self.store
            .record_and_rate(iface, rx_bytes_total, tx_bytes_total, now_millis)
    }

    /// Drop the primary so the next observation is a cold start (counters unreadable).
    pub fn reset_primary(&mut self) {
        self.primary = None;
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }
}
