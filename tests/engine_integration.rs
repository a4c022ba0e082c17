//! End-to-end engine tests driven by a scripted mock executor — no real
//! network traffic, so these exercise pacer, pool, worker, and aggregator
//! wiring deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use yahba_rs::executor::{Executor, ExecutorRequest, ExecutorResponse};
use yahba_rs::errors::ExecutorError;
use yahba_rs::job::{Job, Method};
use yahba_rs::{engine, EngineConfig};

/// Executor that returns a fixed status for every request.
struct FixedStatusExecutor {
    status: u16,
}

#[async_trait]
impl Executor for FixedStatusExecutor {
    async fn execute(&self, _request: ExecutorRequest) -> Result<ExecutorResponse, ExecutorError> {
        Ok(ExecutorResponse {
            status: self.status,
            bytes_sent: 32,
            bytes_received: 64,
        })
    }
}

/// Executor that cycles through a fixed sequence of statuses across calls.
struct RoundRobinExecutor {
    statuses: Vec<u16>,
    calls: AtomicUsize,
}

#[async_trait]
impl Executor for RoundRobinExecutor {
    async fn execute(&self, _request: ExecutorRequest) -> Result<ExecutorResponse, ExecutorError> {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self.statuses[i % self.statuses.len()];
        Ok(ExecutorResponse {
            status,
            bytes_sent: 10,
            bytes_received: 10,
        })
    }
}

/// Executor that always times out, simulating an unresponsive target.
struct AlwaysTimeoutExecutor;

#[async_trait]
impl Executor for AlwaysTimeoutExecutor {
    async fn execute(&self, _request: ExecutorRequest) -> Result<ExecutorResponse, ExecutorError> {
        Err(ExecutorError::timeout("simulated deadline exceeded"))
    }
}

fn config_with(executor: Arc<dyn Executor>, rps: u32) -> EngineConfig {
    EngineConfig {
        rps,
        timeout: Duration::from_secs(1),
        headers: vec![],
        executor,
        job_channel_capacity: 16,
        result_channel_capacity: 64,
    }
}

#[tokio::test]
async fn happy_path_all_succeed() {
    let jobs = Job::repeat("http://example.test/", Method::Get, &[], 10);
    let (_tx, rx) = watch::channel(false);
    let report = engine::run(
        config_with(Arc::new(FixedStatusExecutor { status: 200 }), 20),
        jobs,
        rx,
    )
    .await;

    assert_eq!(report.total_requests, 10);
    assert_eq!(report.successes, 10);
    assert_eq!(report.failures, 0);
    assert_eq!(report.status_histogram.s200, 10);
}

#[tokio::test]
async fn mixed_statuses_classify_correctly() {
    let jobs = Job::repeat("http://example.test/", Method::Get, &[], 4);
    let executor = RoundRobinExecutor {
        statuses: vec![200, 500, 404, 200],
        calls: AtomicUsize::new(0),
    };
    let (_tx, rx) = watch::channel(false);
    let report = engine::run(config_with(Arc::new(executor), 20), jobs, rx).await;

    assert_eq!(report.total_requests, 4);
    assert_eq!(report.successes, 2);
    assert_eq!(report.failures, 2);
    assert_eq!(report.error_breakdown.client_errors, 1);
    assert_eq!(report.error_breakdown.server_errors, 1);
    assert_eq!(report.status_histogram.total(), report.total_requests);
}

#[tokio::test]
async fn all_timeouts_recorded_as_408() {
    let jobs = Job::repeat("http://example.test/", Method::Get, &[], 4);
    let (_tx, rx) = watch::channel(false);
    let report = engine::run(config_with(Arc::new(AlwaysTimeoutExecutor), 10), jobs, rx).await;

    assert_eq!(report.total_requests, 4);
    assert_eq!(report.successes, 0);
    assert_eq!(report.failures, 4);
    assert_eq!(report.error_breakdown.timeouts, 4);
    assert_eq!(report.status_histogram.s408, 4);
}

#[tokio::test]
async fn cancellation_mid_run_yields_partial_report_without_hanging() {
    let jobs = Job::repeat("http://example.test/", Method::Get, &[], 100);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let run = tokio::spawn(engine::run(
        config_with(Arc::new(FixedStatusExecutor { status: 200 }), 10),
        jobs,
        cancel_rx,
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel_tx.send(true).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("engine run must not hang after cancellation")
        .expect("engine task must not panic");

    assert!(report.total_requests <= 100);
    assert_eq!(report.results.len() as u64, report.total_requests);
}

#[tokio::test]
async fn empty_run_produces_zeroed_report() {
    let (_tx, rx) = watch::channel(false);
    let report = engine::run(
        config_with(Arc::new(FixedStatusExecutor { status: 200 }), 10),
        vec![],
        rx,
    )
    .await;

    assert_eq!(report.total_requests, 0);
    assert!(report.results.is_empty());
    assert_eq!(report.latency.min_ms, 0);
    assert_eq!(report.latency.max_ms, 0);
}
