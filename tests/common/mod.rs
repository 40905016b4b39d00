// Shared test helpers: scripted host, counting snapshot source

#![allow(dead_code)]

use hoststat::collector::SnapshotSource;
use hoststat::host::{CoreTicks, HostSource, InterfaceInfo, MemoryUsage};
use hoststat::models::*;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub const GIB: u64 = 1024 * 1024 * 1024;

pub fn minimal_snapshot() -> Snapshot {
    Snapshot {
        uptime_seconds: 0,
        load_averages: [0.0; 3],
        cpu_percent: 0.0,
        cores: 1,
        mem_used_bytes: 0,
        mem_total_bytes: 0,
        swap_used_bytes: 0,
        swap_total_bytes: 0,
        disk_percent: DISK_UNKNOWN,
        network: NetworkRate {
            iface: "eth0".into(),
            ip: None,
            rx_per_sec: 0.0,
            tx_per_sec: 0.0,
        },
        build: BuildIdentity::default(),
        degraded: vec![],
    }
}

pub fn iface(name: &str, up: bool, default_route: bool, ip: Option<[u8; 4]>) -> InterfaceInfo {
    InterfaceInfo {
        name: name.into(),
        is_up: up,
        has_default_route: default_route,
        ipv4: ip.map(Ipv4Addr::from).into_iter().collect(),
        rx_bytes_total: 0,
        tx_bytes_total: 0,
    }
}

/// Host whose readings are set by the test. CPU ticks are consumed in order;
/// once the script runs out every read returns two cores with no progress.
#[derive(Default)]
pub struct FakeHost {
    pub cpu_script: Mutex<VecDeque<Vec<CoreTicks>>>,
    pub cpu_fails: AtomicBool,
    pub interfaces: Mutex<Vec<InterfaceInfo>>,
    pub interfaces_fail: AtomicBool,
    pub disk_percent: Mutex<Option<f64>>,
    pub unavailable: AtomicBool,
    pub uptime_reads: AtomicUsize,
}

impl FakeHost {
    pub fn with_interfaces(interfaces: Vec<InterfaceInfo>) -> Self {
        let host = Self::default();
        *host.interfaces.lock().unwrap() = interfaces;
        *host.disk_percent.lock().unwrap() = Some(42.0);
        host
    }

    pub fn push_ticks(&self, ticks: Vec<CoreTicks>) {
        self.cpu_script.lock().unwrap().push_back(ticks);
    }

    pub fn set_counters(&self, name: &str, rx: u64, tx: u64) {
        for i in self.interfaces.lock().unwrap().iter_mut() {
            if i.name == name {
                i.rx_bytes_total = rx;
                i.tx_bytes_total = tx;
            }
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.unavailable.load(Ordering::SeqCst), "host unavailable");
        Ok(())
    }
}

impl HostSource for FakeHost {
    fn cpu_ticks(&self) -> anyhow::Result<Vec<CoreTicks>> {
        self.check()?;
        anyhow::ensure!(!self.cpu_fails.load(Ordering::SeqCst), "tick read failed");
        Ok(self
            .cpu_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![CoreTicks::default(); 2]))
    }

    fn core_count(&self) -> usize {
        if self.unavailable.load(Ordering::SeqCst) {
            0
        } else {
            2
        }
    }

    fn memory(&self) -> anyhow::Result<MemoryUsage> {
        self.check()?;
        Ok(MemoryUsage {
            used: 3 * GIB,
            total: 8 * GIB,
        })
    }

    fn swap(&self) -> anyhow::Result<MemoryUsage> {
        self.check()?;
        Ok(MemoryUsage {
            used: GIB,
            total: 2 * GIB,
        })
    }

    fn load_average(&self) -> anyhow::Result<[f64; 3]> {
        self.check()?;
        Ok([0.5, 0.25, 0.1])
    }

    fn uptime_secs(&self) -> anyhow::Result<u64> {
        self.uptime_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(93_784)
    }

    fn disk_usage_percent(&self, mount: &str) -> anyhow::Result<f64> {
        self.check()?;
        self.disk_percent
            .lock()
            .unwrap()
            .ok_or_else(|| anyhow::anyhow!("no disk mounted at {}", mount))
    }

    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        self.check()?;
        anyhow::ensure!(
            !self.interfaces_fail.load(Ordering::SeqCst),
            "interface read failed"
        );
        Ok(self.interfaces.lock().unwrap().clone())
    }
}

/// Snapshot source that counts assemblies. Each snapshot carries its call
/// number in `uptime_seconds`.
#[derive(Default)]
pub struct CountingSource {
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub fail: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CountingSource {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of assemblies that ever ran at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl SnapshotSource for CountingSource {
    fn assemble(&self) -> anyhow::Result<Snapshot> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail.load(Ordering::SeqCst), "sampling primitive missing");
        let mut s = minimal_snapshot();
        s.uptime_seconds = n as u64;
        Ok(s)
    }
}
