//! Bounded worker pool: spawns N workers and a pacer, owns the job/result
//! channels, and enforces the close-after-join discipline on shutdown.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::info;

use crate::executor::Executor;
use crate::job::Job;
use crate::pacer;
use crate::result::RequestResult;
use crate::worker::worker;

/// Lower bound on worker count regardless of the requested rate.
const MIN_WORKERS: usize = 4;

/// Upper bound on worker count — caps memory/connection fan-out at very high RPS.
const MAX_WORKERS: usize = 512;

/// Derive worker count from the target rate: one worker per intended RPS,
/// clamped to `[MIN_WORKERS, MAX_WORKERS]`. Worker count and dispatch rate
/// are deliberately decoupled — the pacer alone enforces RPS.
pub fn worker_count_for_rps(rps: u32) -> usize {
    (rps as usize).clamp(MIN_WORKERS, MAX_WORKERS)
}

/// Configuration for [`Pool::run`].
pub struct PoolConfig {
    pub rps: u32,
    pub request_timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub job_channel_capacity: usize,
    pub result_channel_capacity: usize,
}

/// Owns the worker set, the pacer task, and the job/result channels for one
/// run. Spawned fresh per invocation; there is no persistent pool across runs.
pub struct Pool {
    executor: Arc<dyn Executor>,
}

impl Pool {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Run every job in `jobs` to completion (or until `cancel` fires),
    /// returning a receiver that yields one [`RequestResult`] per completed
    /// job. The returned receiver closes once every worker has exited —
    /// callers should drain it to end-of-stream before treating the run as done.
    pub fn run(
        &self,
        jobs: Vec<Job>,
        config: PoolConfig,
        cancel: watch::Receiver<bool>,
    ) -> mpsc::Receiver<RequestResult> {
        let worker_count = worker_count_for_rps(config.rps);
        info!(worker_count, rps = config.rps, total_jobs = jobs.len(), "pool starting");

        let (job_tx, job_rx) = mpsc::channel::<Job>(config.job_channel_capacity.max(1));
        let job_rx = Arc::new(Mutex::new(job_rx));

        let (result_tx, result_rx) =
            mpsc::channel::<RequestResult>(config.result_channel_capacity.max(worker_count));

        let mut worker_handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let executor = Arc::clone(&self.executor);
            let timeout = config.request_timeout;
            let headers = config.headers.clone();
            let cancel = cancel.clone();

            worker_handles.push(tokio::spawn(async move {
                worker::run(worker_id, job_rx, result_tx, executor, timeout, headers, cancel).await;
            }));
        }

        // Drop the pool's own result sender now that every worker holds a
        // clone; the channel closes once workers finish, not before.
        drop(result_tx);

        let rps = config.rps;
        let pacer_cancel = cancel;
        tokio::spawn(async move {
            pacer::run(jobs, rps, job_tx, pacer_cancel).await;
            join_all(worker_handles).await;
            info!("pool finished: all workers exited");
        });

        result_rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_respects_bounds() {
        assert_eq!(worker_count_for_rps(1), MIN_WORKERS);
        assert_eq!(worker_count_for_rps(50), 50);
        assert_eq!(worker_count_for_rps(100_000), MAX_WORKERS);
    }
}
