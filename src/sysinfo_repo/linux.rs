// Linux-specific helpers: /proc/stat ticks, /proc/net/route, interface operstate.

use crate::host::CoreTicks;

/// Read per-core tick counters from /proc/stat (Linux).
pub(super) fn read_core_ticks() -> anyhow::Result<Vec<CoreTicks>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat")?;
        Ok(parse_proc_stat(&content))
    }
    #[cfg(not(target_os = "linux"))]
    anyhow::bail!("per-core tick counters are only read on Linux")
}

/// Names of interfaces carrying a default route (destination 0.0.0.0), from /proc/net/route.
pub(super) fn default_route_interfaces() -> Vec<String> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = std::fs::read_to_string("/proc/net/route") {
            return parse_default_routes(&content);
        }
    }
    Vec::new()
}

/// Whether /sys/class/net/<interface>/operstate reports the link as usable.
/// Virtual links (tun, loopback) report "unknown"; those count as up.
/// Off Linux, interfaces are assumed up.
pub(super) fn interface_is_up(interface_name: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/operstate", interface_name);
        if let Ok(content) = std::fs::read_to_string(&path) {
            return matches!(content.trim(), "up" | "unknown");
        }
        false
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        true
    }
}

/// Parse `cpuN` lines. idle = idle + iowait; total = user..steal.
pub(super) fn parse_proc_stat(content: &str) -> Vec<CoreTicks> {
    content
        .lines()
        .filter(|l| {
            l.strip_prefix("cpu")
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_digit())
        })
        .filter_map(|line| {
            let nums: Vec<u64> = line
                .split_whitespace()
                .skip(1)
                .filter_map(|x| x.parse().ok())
                .collect();
            if nums.len() < 4 {
                return None;
            }
            Some(CoreTicks {
                idle: nums[3] + nums.get(4).copied().unwrap_or(0),
                total: nums.iter().take(8).sum(),
            })
        })
        .collect()
}

pub(super) fn parse_default_routes(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in content.lines().skip(1) {
        let mut cols = line.split_whitespace();
        if let (Some(iface), Some(dest)) = (cols.next(), cols.next())
            && dest == "00000000"
            && !names.iter().any(|n| n == iface)
        {
            names.push(iface.to_string());
        }
    }
    names
}
