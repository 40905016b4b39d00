// CPU sampler: per-core busy mean, degraded reads

mod common;

use common::FakeHost;
use hoststat::collector::cpu::{CpuSampler, DEFAULT_CPU_WINDOW, busy_percent};
use hoststat::host::CoreTicks;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn ticks(pairs: &[(u64, u64)]) -> Vec<CoreTicks> {
    pairs
        .iter()
        .map(|&(idle, total)| CoreTicks { idle, total })
        .collect()
}

#[test]
fn mean_of_per_core_busy_fractions() {
    let before = ticks(&[(100, 200), (100, 200)]);
    let after = ticks(&[(150, 300), (100, 300)]);
    let p = busy_percent(&before, &after).unwrap();
    assert!((p - 75.0).abs() < 1e-9);
}

#[test]
fn stalled_core_counts_as_idle() {
    let before = ticks(&[(100, 200), (100, 200)]);
    let after = ticks(&[(100, 200), (100, 300)]);
    let p = busy_percent(&before, &after).unwrap();
    assert!((p - 50.0).abs() < 1e-9);
}

#[test]
fn no_cores_is_none() {
    assert_eq!(busy_percent(&[], &[]), None);
    assert_eq!(busy_percent(&ticks(&[(1, 2)]), &[]), None);
}

#[test]
fn result_is_bounded_even_for_odd_counters() {
    // idle advancing more than total, or counters going backwards
    let before = ticks(&[(100, 200), (500, 900)]);
    let after = ticks(&[(400, 250), (400, 800)]);
    let p = busy_percent(&before, &after).unwrap();
    assert!((0.0..=100.0).contains(&p));
}

#[test]
fn fully_busy_is_hundred() {
    let p = busy_percent(&ticks(&[(10, 10)]), &ticks(&[(10, 110)])).unwrap();
    assert!((p - 100.0).abs() < 1e-9);
}

#[test]
fn default_window_is_200ms() {
    assert_eq!(DEFAULT_CPU_WINDOW, Duration::from_millis(200));
    assert_eq!(CpuSampler::default().window(), DEFAULT_CPU_WINDOW);
}

#[test]
fn sampler_reads_twice_across_window() {
    let host = FakeHost::default();
    host.push_ticks(ticks(&[(0, 0), (0, 0)]));
    host.push_ticks(ticks(&[(80, 100), (20, 100)]));
    let reading = CpuSampler::new(Duration::ZERO).sample(&host);
    assert!(!reading.degraded);
    assert!((reading.percent - 50.0).abs() < 1e-9);
    assert!(host.cpu_script.lock().unwrap().is_empty());
}

#[test]
fn sampler_waits_for_window() {
    let host = FakeHost::default();
    let started = std::time::Instant::now();
    CpuSampler::new(Duration::from_millis(30)).sample(&host);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[test]
fn failed_tick_read_degrades_to_zero() {
    let host = FakeHost::default();
    host.cpu_fails.store(true, Ordering::SeqCst);
    let reading = CpuSampler::new(Duration::ZERO).sample(&host);
    assert!(reading.degraded);
    assert_eq!(reading.percent, 0.0);
}

#[test]
fn zero_cores_degrades_to_zero() {
    let host = FakeHost::default();
    host.push_ticks(vec![]);
    let reading = CpuSampler::new(Duration::ZERO).sample(&host);
    assert!(reading.degraded);
    assert_eq!(reading.percent, 0.0);
}
