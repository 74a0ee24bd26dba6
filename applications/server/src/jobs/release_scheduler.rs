/// Periodic release sweep
use cadence_core::{types::SweepReport, ReleaseSweeper};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Runs the release sweep on a fixed interval
///
/// A sweep that fails or overruns its timeout is logged and dropped; the next
/// tick runs the same idempotent sweep again.
pub struct ReleaseScheduler {
    sweeper: Arc<dyn ReleaseSweeper>,
    interval: Duration,
    timeout: Duration,
}

/// Running scheduler loop
pub struct ReleaseSchedulerHandle {
    shutdown_token: CancellationToken,
    task: JoinHandle<()>,
}

impl ReleaseScheduler {
    pub fn new(sweeper: Arc<dyn ReleaseSweeper>, interval: Duration, timeout: Duration) -> Self {
        Self {
            sweeper,
            interval,
            timeout,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep now
    ///
    /// Returns `None` if the sweep failed or timed out.
    pub async fn run_once(&self) -> Option<SweepReport> {
        match tokio::time::timeout(self.timeout, self.sweeper.run_release_sweep()).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Release sweep failed");
                None
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.timeout.as_secs(),
                    "Release sweep timed out"
                );
                None
            }
        }
    }

    /// Start the sweep loop
    ///
    /// The first sweep runs one full interval after start; startup catch-up
    /// is the caller's job (see `run_once`).
    pub fn start(self: Arc<Self>) -> ReleaseSchedulerHandle {
        let shutdown_token = CancellationToken::new();
        let token = shutdown_token.clone();

        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
            // A slow sweep delays the next one instead of causing a burst
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = self.interval.as_secs(),
                "Release scheduler started"
            );

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }

            tracing::info!("Release scheduler stopped");
        });

        ReleaseSchedulerHandle {
            shutdown_token,
            task,
        }
    }
}

impl ReleaseSchedulerHandle {
    /// Stop the loop and wait for an in-flight sweep to finish
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Release scheduler task failed");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}
