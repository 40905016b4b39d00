// Snapshot cache semantics: single-flight fill, shared reads, failure retention

mod common;

use common::CountingSource;
use futures_util::future::join_all;
use hoststat::collector::Collector;
use hoststat::error::CollectorError;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_on_empty_cache_share_one_assembly() {
    let source = Arc::new(CountingSource::with_delay(Duration::from_millis(50)));
    let collector = Arc::new(Collector::new(source.clone()));

    let calls = (0..8).map(|_| {
        let c = collector.clone();
        tokio::spawn(async move { c.get_or_compute().await })
    });
    let results: Vec<_> = join_all(calls)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    assert_eq!(source.calls(), 1);
    for s in &results {
        assert!(Arc::ptr_eq(s, &results[0]));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn populated_cache_serves_same_snapshot_without_sampling() {
    let source = Arc::new(CountingSource::default());
    let collector = Arc::new(Collector::new(source.clone()));
    let installed = collector.refresh().await.unwrap();
    assert_eq!(source.calls(), 1);

    let reads = join_all((0..32).map(|_| {
        let c = collector.clone();
        async move { c.get_or_compute().await.unwrap() }
    }))
    .await;

    assert_eq!(source.calls(), 1);
    assert!(reads.iter().all(|s| Arc::ptr_eq(s, &installed)));
}

#[tokio::test]
async fn refresh_supersedes_previous_snapshot() {
    let source = Arc::new(CountingSource::default());
    let collector = Collector::new(source.clone());
    let first = collector.get_or_compute().await.unwrap();
    let second = collector.refresh().await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.uptime_seconds, 1);
    assert_eq!(second.uptime_seconds, 2);
    let now = collector.get_or_compute().await.unwrap();
    assert!(Arc::ptr_eq(&now, &second));
    assert!(collector.cache_entry().unwrap().captured_at_millis > 0);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let source = Arc::new(CountingSource::default());
    let collector = Collector::new(source.clone());
    let good = collector.refresh().await.unwrap();

    source.fail.store(true, Ordering::SeqCst);
    let err = collector.refresh().await.unwrap_err();
    assert!(matches!(err, CollectorError::Transient(_)));

    let still = collector.get_or_compute().await.unwrap();
    assert!(Arc::ptr_eq(&still, &good));
}

#[tokio::test]
async fn empty_cache_failure_surfaces_transient_error() {
    let source = Arc::new(CountingSource::default());
    source.fail.store(true, Ordering::SeqCst);
    let collector = Collector::new(source.clone());

    let err = collector.get_or_compute().await.unwrap_err();
    assert!(matches!(err, CollectorError::Transient(_)));
    assert!(err.to_string().contains("snapshot unavailable"));
    assert!(collector.cached().is_none());

    source.fail.store(false, Ordering::SeqCst);
    let s = collector.get_or_compute().await.unwrap();
    assert_eq!(s.uptime_seconds, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn refresh_and_first_read_do_not_overlap() {
    let source = Arc::new(CountingSource::with_delay(Duration::from_millis(40)));
    let collector = Arc::new(Collector::new(source.clone()));

    let refresher = {
        let c = collector.clone();
        tokio::spawn(async move { c.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let read = collector.get_or_compute().await.unwrap();
    let refreshed = refresher.await.unwrap().unwrap();

    assert_eq!(source.calls(), 1);
    assert!(Arc::ptr_eq(&read, &refreshed));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelled_first_read_still_installs_and_blocks_overlap() {
    let source = Arc::new(CountingSource::with_delay(Duration::from_millis(200)));
    let collector = Arc::new(Collector::new(source.clone()));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), collector.get_or_compute()).await;
    assert!(timed_out.is_err());
    assert!(!collector.is_populated());

    // Waits for the abandoned fill instead of starting a second assembly.
    let read = collector.get_or_compute().await.unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(read.uptime_seconds, 1);
    assert!(collector.is_populated());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn refresh_after_cancelled_read_runs_serially() {
    let source = Arc::new(CountingSource::with_delay(Duration::from_millis(200)));
    let collector = Arc::new(Collector::new(source.clone()));

    let _ = tokio::time::timeout(Duration::from_millis(20), collector.get_or_compute()).await;
    let refreshed = collector.refresh().await.unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(source.max_in_flight(), 1);
    assert_eq!(refreshed.uptime_seconds, 2);
    let now = collector.get_or_compute().await.unwrap();
    assert!(Arc::ptr_eq(&now, &refreshed));
}
