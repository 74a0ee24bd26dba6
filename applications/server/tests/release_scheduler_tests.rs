/// Release scheduler tests
/// Failures and timeouts use mock sweepers, interval behaviour uses paused tokio time
mod common;

use async_trait::async_trait;
use cadence_core::{types::SweepReport, CadenceError, MockReleaseSweeper, ReleaseSweeper};
use cadence_server::jobs::ReleaseScheduler;
use chrono::Utc;
use common::create_test_catalog;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

const INTERVAL: Duration = Duration::from_secs(60);
const TIMEOUT: Duration = Duration::from_secs(5);

/// Sweeper that never finishes
struct HangingSweeper;

#[async_trait]
impl ReleaseSweeper for HangingSweeper {
    async fn run_release_sweep(&self) -> cadence_core::Result<SweepReport> {
        std::future::pending().await
    }
}

/// Sweeper that counts its runs
#[derive(Default)]
struct CountingSweeper {
    runs: AtomicUsize,
}

#[async_trait]
impl ReleaseSweeper for CountingSweeper {
    async fn run_release_sweep(&self) -> cadence_core::Result<SweepReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(SweepReport::empty(Utc::now()))
    }
}

#[tokio::test]
async fn test_run_once_returns_report() {
    let report = SweepReport {
        swept_at: Utc::now(),
        albums_activated: 2,
        standalone_tracks_activated: 1,
        attached_tracks_synced: 5,
    };

    let mut sweeper = MockReleaseSweeper::new();
    sweeper
        .expect_run_release_sweep()
        .times(1)
        .returning(move || Ok(report));

    let scheduler = ReleaseScheduler::new(Arc::new(sweeper), INTERVAL, TIMEOUT);

    assert_eq!(scheduler.run_once().await, Some(report));
}

#[tokio::test]
async fn test_run_once_swallows_store_errors() {
    let mut sweeper = MockReleaseSweeper::new();
    sweeper
        .expect_run_release_sweep()
        .times(2)
        .returning(|| Err(CadenceError::Database("database is locked".to_string())));

    let scheduler = ReleaseScheduler::new(Arc::new(sweeper), INTERVAL, TIMEOUT);

    // Failing repeatedly is fine, every attempt just logs
    assert!(scheduler.run_once().await.is_none());
    assert!(scheduler.run_once().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_run_once_gives_up_after_timeout() {
    let scheduler = ReleaseScheduler::new(Arc::new(HangingSweeper), INTERVAL, TIMEOUT);

    let started = tokio::time::Instant::now();
    let result = scheduler.run_once().await;

    assert!(result.is_none());
    assert!(started.elapsed() >= TIMEOUT);
}

#[tokio::test(start_paused = true)]
async fn test_start_sweeps_on_every_interval() {
    let sweeper = Arc::new(CountingSweeper::default());
    let scheduler = Arc::new(ReleaseScheduler::new(sweeper.clone(), INTERVAL, TIMEOUT));

    let handle = scheduler.start();

    // No sweep at start, the first one is a full interval away
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(sweeper.runs.load(Ordering::SeqCst), 0);

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(sweeper.runs.load(Ordering::SeqCst), 1);

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(sweeper.runs.load(Ordering::SeqCst), 2);

    assert!(handle.is_running());
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_the_loop() {
    let sweeper = Arc::new(CountingSweeper::default());
    let scheduler = Arc::new(ReleaseScheduler::new(sweeper.clone(), INTERVAL, TIMEOUT));

    let handle = scheduler.start();
    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
    handle.stop().await;

    let runs = sweeper.runs.load(Ordering::SeqCst);
    tokio::time::sleep(INTERVAL * 10).await;

    assert_eq!(sweeper.runs.load(Ordering::SeqCst), runs);
}

#[tokio::test(start_paused = true)]
async fn test_failing_sweeps_keep_the_loop_alive() {
    let mut sweeper = MockReleaseSweeper::new();
    sweeper
        .expect_run_release_sweep()
        .times(3)
        .returning(|| Err(CadenceError::storage("disk full")));

    let scheduler = Arc::new(ReleaseScheduler::new(Arc::new(sweeper), INTERVAL, TIMEOUT));
    let handle = scheduler.start();

    tokio::time::sleep(INTERVAL * 3 + Duration::from_secs(1)).await;

    assert!(handle.is_running());
    handle.stop().await;
}

#[tokio::test]
async fn test_run_once_against_real_catalog() {
    let test_catalog = create_test_catalog().await.unwrap();
    let scheduler = ReleaseScheduler::new(test_catalog.catalog.clone(), INTERVAL, TIMEOUT);

    let report = scheduler.run_once().await.expect("Sweep should succeed");

    assert!(!report.changed_anything());
}
