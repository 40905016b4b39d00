// Text projections of a snapshot for the console. Pure; no collector state.

use crate::models::Snapshot;

/// 1024-based units; one decimal below 10.
pub fn bytes(n: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut v = n;
    let mut i = 0;
    while v >= 1024.0 && i < UNITS.len() - 1 {
        v /= 1024.0;
        i += 1;
    }
    if v < 10.0 {
        format!("{:.1}{}", v, UNITS[i])
    } else {
        format!("{:.0}{}", v, UNITS[i])
    }
}

pub fn percent(p: f64) -> String {
    format!("{}%", p.round() as i64)
}

pub fn format_uptime(secs: u64) -> String {
    let d = secs / 86_400;
    let h = (secs % 86_400) / 3_600;
    let m = (secs % 3_600) / 60;
    format!("{}d {}h {}m", d, h, m)
}

fn disk(snapshot: &Snapshot) -> String {
    if snapshot.disk_known() {
        percent(snapshot.disk_percent)
    } else {
        "n/a".into()
    }
}

fn load(snapshot: &Snapshot) -> String {
    snapshot
        .load_averages
        .iter()
        .map(|n| format!("{:.2}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMode {
    #[default]
    Short,
    Long,
    Json,
}

impl StatusMode {
    /// Unknown or missing modes fall back to `Short`.
    pub fn parse(mode: Option<&str>) -> Self {
        match mode {
            Some("long") => Self::Long,
            Some("json") => Self::Json,
            _ => Self::Short,
        }
    }
}

pub fn status_short(s: &Snapshot) -> String {
    format!(
        "up {} • cpu {} • mem {} • disk {} • net {} rx {}/s tx {}/s",
        format_uptime(s.uptime_seconds),
        percent(s.cpu_percent),
        percent(s.mem_percent()),
        disk(s),
        s.network.iface,
        bytes(s.network.rx_per_sec),
        bytes(s.network.tx_per_sec),
    )
}

pub fn status_long(s: &Snapshot, disk_mount: &str) -> String {
    let build_hash = if s.build.hash.is_empty() {
        "n/a"
    } else {
        s.build.hash.as_str()
    };
    let deployed = if s.build.deployed_at.is_empty() {
        "n/a"
    } else {
        s.build.deployed_at.as_str()
    };
    let mut lines = vec![sys_text(s, disk_mount), net_text(s)];
    lines.push(format!("Build {} • deployed {}", build_hash, deployed));
    lines.join("\n")
}

pub fn sys_text(s: &Snapshot, disk_mount: &str) -> String {
    [
        format!(
            "Host • uptime {} • load {}",
            format_uptime(s.uptime_seconds),
            load(s)
        ),
        format!("CPU {} • {} cores", percent(s.cpu_percent), s.cores),
        format!(
            "Mem {} / {} ({})",
            bytes(s.mem_used_bytes as f64),
            bytes(s.mem_total_bytes as f64),
            percent(s.mem_percent())
        ),
        format!(
            "Swap {} / {} ({})",
            bytes(s.swap_used_bytes as f64),
            bytes(s.swap_total_bytes as f64),
            percent(s.swap_percent())
        ),
        disk_text(s, disk_mount),
    ]
    .join("\n")
}

pub fn net_text(s: &Snapshot) -> String {
    format!(
        "Net • iface {} • IP {} • rx {}/s • tx {}/s",
        s.network.iface,
        ip(s),
        bytes(s.network.rx_per_sec),
        bytes(s.network.tx_per_sec)
    )
}

fn ip(s: &Snapshot) -> String {
    s.network
        .ip
        .map_or_else(|| "n/a".to_string(), |a| a.to_string())
}

pub fn disk_text(s: &Snapshot, disk_mount: &str) -> String {
    format!("Disk {} {}", disk_mount, disk(s))
}
