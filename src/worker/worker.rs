//! Per-job request lifecycle: build, send, classify, emit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, trace};

use crate::executor::{Executor, ExecutorRequest};
use crate::job::Job;
use crate::result::RequestResult;

/// Run one worker to completion: pull jobs from the shared job channel until
/// it closes or cancellation is observed, executing each via `executor` and
/// emitting exactly one [`RequestResult`] per job it picks up.
///
/// A worker never panics on a request failure — every outcome, success or
/// error, becomes a `RequestResult` sent on `result_tx`.
pub async fn run(
    worker_id: usize,
    job_rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    result_tx: mpsc::Sender<RequestResult>,
    executor: Arc<dyn Executor>,
    timeout: Duration,
    headers: Vec<(String, String)>,
    mut cancel: watch::Receiver<bool>,
) {
    debug!(worker_id, "worker starting");

    loop {
        if *cancel.borrow() {
            break;
        }

        let job = {
            let mut rx = job_rx.lock().await;
            tokio::select! {
                job = rx.recv() => job,
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        None
                    } else {
                        continue;
                    }
                }
            }
        };

        let Some(job) = job else {
            break;
        };

        let builder = RequestResult::builder(worker_id, job.target_url.clone(), job.method);

        let request = ExecutorRequest {
            method: job.method,
            url: job.target_url.clone(),
            headers: headers.clone(),
            body: job.body,
            timeout,
        };

        let result = match executor.execute(request).await {
            Ok(response) => builder.success(
                response.status,
                response.bytes_sent,
                response.bytes_received,
            ),
            Err(err) => builder.failure(&err, 0),
        };

        trace!(worker_id, status = result.status, elapsed_ms = result.elapsed_ms, "job completed");

        if result_tx.send(result).await.is_err() {
            // Aggregator gone; nothing downstream can use further results.
            break;
        }
    }

    debug!(worker_id, "worker exiting");
}
