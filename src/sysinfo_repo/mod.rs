// Host readings via sysinfo, with /proc fallbacks for what sysinfo does not expose

mod linux;

use crate::host::{CoreTicks, HostSource, InterfaceInfo, MemoryUsage};
use std::net::IpAddr;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sysinfo::{Disks, Networks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> anyhow::Result<MutexGuard<'a, T>> {
    m.lock()
        .map_err(|e| anyhow::anyhow!("sysinfo {} lock poisoned: {}", what, e))
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
        }
    }
}

impl HostSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_ticks"))]
    fn cpu_ticks(&self) -> anyhow::Result<Vec<CoreTicks>> {
        linux::read_core_ticks()
    }

    fn core_count(&self) -> usize {
        match lock(&self.sys, "system") {
            Ok(sys) => sys.cpus().len(),
            Err(_) => 0,
        }
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    fn memory(&self) -> anyhow::Result<MemoryUsage> {
        let mut sys = lock(&self.sys, "system")?;
        sys.refresh_memory();
        let total = sys.total_memory();
        anyhow::ensure!(total > 0, "total memory not reported");
        let used = total.saturating_sub(sys.available_memory());
        Ok(MemoryUsage { used, total })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "swap"))]
    fn swap(&self) -> anyhow::Result<MemoryUsage> {
        let mut sys = lock(&self.sys, "system")?;
        sys.refresh_memory();
        let total = sys.total_swap();
        Ok(MemoryUsage {
            used: sys.used_swap().min(total),
            total,
        })
    }

    fn load_average(&self) -> anyhow::Result<[f64; 3]> {
        let load = System::load_average();
        Ok([load.one, load.five, load.fifteen])
    }

    fn uptime_secs(&self) -> anyhow::Result<u64> {
        Ok(System::uptime())
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disk_usage_percent"))]
    fn disk_usage_percent(&self, mount: &str) -> anyhow::Result<f64> {
        let mut disks = lock(&self.disks, "disks")?;
        disks.refresh(false);
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new(mount))
            .ok_or_else(|| anyhow::anyhow!("no disk mounted at {}", mount))?;
        let total = disk.total_space();
        anyhow::ensure!(total > 0, "disk at {} reports zero size", mount);
        let used = total.saturating_sub(disk.available_space());
        Ok(((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0))
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interfaces"))]
    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        let mut networks = lock(&self.networks, "networks")?;
        networks.refresh(true);
        let routed = linux::default_route_interfaces();
        let mut interfaces: Vec<InterfaceInfo> = networks
            .list()
            .iter()
            .map(|(name, data)| InterfaceInfo {
                name: name.clone(),
                is_up: linux::interface_is_up(name),
                has_default_route: routed.iter().any(|r| r == name),
                ipv4: data
                    .ip_networks()
                    .iter()
                    .filter_map(|n| match n.addr {
                        IpAddr::V4(v4) => Some(v4),
                        IpAddr::V6(_) => None,
                    })
                    .collect(),
                rx_bytes_total: data.total_received(),
                tx_bytes_total: data.total_transmitted(),
            })
            .collect();
        // sysinfo hands back a HashMap; keep "first up interface" stable across refreshes.
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }
}
