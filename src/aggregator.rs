//! Drains the result stream into a [`Report`]. Aggregation is total: it
//! never fails, and a closed channel with zero results still produces a
//! valid (all-zero) report.

use tokio::sync::mpsc;
use tracing::debug;

use crate::report::Report;
use crate::result::RequestResult;

/// Consume `result_rx` until the channel closes, folding every
/// [`RequestResult`] into a [`Report`]. Percentiles and throughput rates are
/// left to the caller's subsequent [`Report::finalize`] call once wall-clock
/// timestamps are available.
pub async fn run(mut result_rx: mpsc::Receiver<RequestResult>) -> Report {
    let mut report = Report::empty();

    while let Some(result) = result_rx.recv().await {
        report.record(result);
    }

    debug!(total_requests = report.total_requests, "aggregator drained result stream");
    report
}
