//! Fixed-interval runner for the monitoring cycle.
//!
//! The task runs immediately, then again `period` after each run finishes,
//! until the shutdown future resolves. Shutdown is observed while waiting,
//! never in the middle of a run.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Drive `task` until `shutdown` completes. Returns how many runs finished.
    pub async fn run<T, Fut, S>(&self, mut task: T, shutdown: S) -> u64
    where
        T: FnMut() -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut runs = 0u64;

        loop {
            task().await;
            runs += 1;
            debug!(runs, next_in_secs = self.period.as_secs(), "Sleeping until next cycle");

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(runs, "Shutdown requested; scheduler stopped");
                    return runs;
                }
                _ = tokio::time::sleep(self.period) => {}
            }
        }
    }
}
