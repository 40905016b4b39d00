// Host OS interface: the read-only facts the collector samples.
// Every read may fail (sandboxed hosts, non-Linux); callers degrade instead of aborting.

use std::net::Ipv4Addr;

/// Cumulative tick counters for one core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreTicks {
    pub idle: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryUsage {
    pub used: u64,
    pub total: u64,
}

/// One network interface as seen at read time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceInfo {
    pub name: String,
    pub is_up: bool,
    pub has_default_route: bool,
    pub ipv4: Vec<Ipv4Addr>,
    pub rx_bytes_total: u64,
    pub tx_bytes_total: u64,
}

impl InterfaceInfo {
    /// True when the interface carries an IPv4 address that is not loopback.
    pub fn has_external_ipv4(&self) -> bool {
        self.ipv4.iter().any(|a| !a.is_loopback())
    }

    /// First non-loopback IPv4, falling back to any IPv4 at all.
    pub fn preferred_ipv4(&self) -> Option<Ipv4Addr> {
        self.ipv4
            .iter()
            .find(|a| !a.is_loopback())
            .or_else(|| self.ipv4.first())
            .copied()
    }
}

pub trait HostSource: Send + Sync {
    /// Per-core `{idle, total}` ticks; empty or `Err` when unavailable.
    fn cpu_ticks(&self) -> anyhow::Result<Vec<CoreTicks>>;

    fn core_count(&self) -> usize;

    fn memory(&self) -> anyhow::Result<MemoryUsage>;

    fn swap(&self) -> anyhow::Result<MemoryUsage>;

    /// 1, 5 and 15 minute load averages.
    fn load_average(&self) -> anyhow::Result<[f64; 3]>;

    fn uptime_secs(&self) -> anyhow::Result<u64>;

    /// Used-space percent of the filesystem mounted at `mount`.
    fn disk_usage_percent(&self, mount: &str) -> anyhow::Result<f64>;

    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>>;
}
