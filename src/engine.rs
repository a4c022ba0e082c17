//! Top-level driver: wires the pool and aggregator together, stamps
//! wall-clock timing onto the finalized report.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tracing::info;

use crate::aggregator;
use crate::executor::Executor;
use crate::job::Job;
use crate::report::Report;
use crate::worker::pool::{Pool, PoolConfig};

/// Inputs the core consumes to run one load test. Distinct from `CliArgs`,
/// which is a superset covering flags the engine itself never sees.
pub struct EngineConfig {
    pub rps: u32,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub executor: Arc<dyn Executor>,
    pub job_channel_capacity: usize,
    pub result_channel_capacity: usize,
}

/// Run `jobs` to completion (or until `cancellation` fires) and return the
/// finalized report. The only error this surfaces is executor construction
/// failure — per-request failures are recorded, never propagated.
///
/// If `cancellation` fires before the result stream closes, this returns a
/// partial report reflecting whatever results the aggregator folded before
/// shutdown completed — not an error.
pub async fn run(config: EngineConfig, jobs: Vec<Job>, cancellation: watch::Receiver<bool>) -> Report {
    let total_jobs = jobs.len();
    info!(total_jobs, rps = config.rps, "engine run starting");

    let pool = Pool::new(Arc::clone(&config.executor));
    let pool_config = PoolConfig {
        rps: config.rps,
        request_timeout: config.timeout,
        headers: config.headers,
        job_channel_capacity: config.job_channel_capacity,
        result_channel_capacity: config.result_channel_capacity,
    };

    let wall_start = SystemTime::now();
    let result_rx = pool.run(jobs, pool_config, cancellation);
    let report = aggregator::run(result_rx).await;
    let wall_end = SystemTime::now();

    let report = report.finalize(wall_start, wall_end);
    info!(
        total_requests = report.total_requests,
        successes = report.successes,
        failures = report.failures,
        "engine run complete"
    );
    report
}
