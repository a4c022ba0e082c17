//! The finalized aggregate: percentiles, throughput, histograms.
//!
//! Percentile convention fixes the off-by-one the original Go
//! implementation had at `sorted[len*p/100]`: this uses nearest-rank,
//! `index = ceil(p/100 * n) - 1`, clamped to `[0, n-1]`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::result::RequestResult;

/// Per-status-code counts, plus an `other` bucket for anything not named.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusHistogram {
    #[serde(rename = "200")]
    pub s200: u64,
    #[serde(rename = "201")]
    pub s201: u64,
    #[serde(rename = "204")]
    pub s204: u64,
    #[serde(rename = "400")]
    pub s400: u64,
    #[serde(rename = "403")]
    pub s403: u64,
    #[serde(rename = "404")]
    pub s404: u64,
    #[serde(rename = "408")]
    pub s408: u64,
    #[serde(rename = "429")]
    pub s429: u64,
    #[serde(rename = "500")]
    pub s500: u64,
    #[serde(rename = "502")]
    pub s502: u64,
    #[serde(rename = "503")]
    pub s503: u64,
    #[serde(rename = "504")]
    pub s504: u64,
    pub other: u64,
}

impl StatusHistogram {
    fn record(&mut self, status: u16) {
        match status {
            200 => self.s200 += 1,
            201 => self.s201 += 1,
            204 => self.s204 += 1,
            400 => self.s400 += 1,
            403 => self.s403 += 1,
            404 => self.s404 += 1,
            408 => self.s408 += 1,
            429 => self.s429 += 1,
            500 => self.s500 += 1,
            502 => self.s502 += 1,
            503 => self.s503 += 1,
            504 => self.s504 += 1,
            _ => self.other += 1,
        }
    }

    /// Sum across every bucket, used to assert the total-requests invariant.
    pub fn total(&self) -> u64 {
        self.s200
            + self.s201
            + self.s204
            + self.s400
            + self.s403
            + self.s404
            + self.s408
            + self.s429
            + self.s500
            + self.s502
            + self.s503
            + self.s504
            + self.other
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorBreakdown {
    pub client_errors: u64,
    pub server_errors: u64,
    pub timeouts: u64,
}

/// Latency percentiles in milliseconds. All-zero (not absent) when `n == 0`,
/// matching the spec's "no division by zero" rule for the empty-run case.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Latency {
    pub min_ms: u128,
    pub max_ms: u128,
    pub mean_ms: f64,
    pub p50_ms: u128,
    pub p95_ms: u128,
    pub p99_ms: u128,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Throughput {
    pub bytes_sent_total: u64,
    pub bytes_received_total: u64,
    pub bytes_sent_per_second: f64,
    pub bytes_received_per_second: f64,
}

/// The finalized aggregate report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub results: Vec<RequestResult>,
    pub total_requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub error_breakdown: ErrorBreakdown,
    pub status_histogram: StatusHistogram,
    pub latency: Latency,
    pub throughput: Throughput,
    pub wall_clock_start_unix_ms: u128,
    pub wall_clock_end_unix_ms: u128,
    pub duration_ms: u128,
}

impl Report {
    /// Build an empty report anchored at `now` — used both for the `n == 0`
    /// fast path and as the accumulator the aggregator folds results into.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total_requests: 0,
            successes: 0,
            failures: 0,
            error_breakdown: ErrorBreakdown::default(),
            status_histogram: StatusHistogram::default(),
            latency: Latency::default(),
            throughput: Throughput::default(),
            wall_clock_start_unix_ms: 0,
            wall_clock_end_unix_ms: 0,
            duration_ms: 0,
        }
    }

    /// Fold one result into the running totals. Order-independent state
    /// (histogram, byte totals, error breakdown) updates immediately;
    /// percentiles are deferred to [`Report::finalize`].
    pub fn record(&mut self, result: RequestResult) {
        self.total_requests += 1;
        self.status_histogram.record(result.status);
        self.throughput.bytes_sent_total += result.bytes_sent;
        self.throughput.bytes_received_total += result.bytes_received;

        if result.is_client_error() {
            self.error_breakdown.client_errors += 1;
        }
        if result.is_server_error() {
            self.error_breakdown.server_errors += 1;
        }
        if result.is_timeout() {
            self.error_breakdown.timeouts += 1;
        }

        let failed = result.status >= 400 || result.error.is_some();
        if failed {
            self.failures += 1;
        } else {
            self.successes += 1;
        }

        self.results.push(result);
    }

    /// Compute percentiles and throughput rates from the accumulated results.
    /// Attaches wall-clock start/end captured by the driver.
    pub fn finalize(mut self, wall_start: SystemTime, wall_end: SystemTime) -> Self {
        self.wall_clock_start_unix_ms = unix_millis(wall_start);
        self.wall_clock_end_unix_ms = unix_millis(wall_end);
        self.duration_ms = wall_end
            .duration_since(wall_start)
            .unwrap_or(Duration::ZERO)
            .as_millis();

        let n = self.results.len();
        if n == 0 {
            return self;
        }

        let mut elapsed_ms: Vec<u128> = self.results.iter().map(|r| r.elapsed_ms).collect();
        elapsed_ms.sort_unstable();

        let total_elapsed_ms: u128 = elapsed_ms.iter().sum();

        self.latency = Latency {
            min_ms: elapsed_ms[0],
            max_ms: elapsed_ms[n - 1],
            mean_ms: total_elapsed_ms as f64 / n as f64,
            p50_ms: nearest_rank(&elapsed_ms, 50),
            p95_ms: nearest_rank(&elapsed_ms, 95),
            p99_ms: nearest_rank(&elapsed_ms, 99),
        };

        let total_elapsed_secs = total_elapsed_ms as f64 / 1000.0;
        if total_elapsed_secs > 0.0 {
            self.throughput.bytes_sent_per_second =
                self.throughput.bytes_sent_total as f64 / total_elapsed_secs;
            self.throughput.bytes_received_per_second =
                self.throughput.bytes_received_total as f64 / total_elapsed_secs;
        }

        self
    }
}

/// Nearest-rank percentile: `index = ceil(p/100 * n) - 1`, clamped to `[0, n-1]`.
fn nearest_rank(sorted: &[u128], percentile: u64) -> u128 {
    let n = sorted.len();
    debug_assert!(n > 0);
    let rank = (percentile as f64 / 100.0 * n as f64).ceil() as isize - 1;
    let idx = rank.clamp(0, n as isize - 1) as usize;
    sorted[idx]
}

fn unix_millis(t: SystemTime) -> u128 {
    t.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Method;

    fn result_with_elapsed(ms: u128, status: u16) -> RequestResult {
        let start = std::time::Instant::now();
        let end = start + Duration::from_millis(ms as u64);
        RequestResult {
            worker_id: 0,
            start,
            end,
            elapsed_ms: ms,
            target_url: "http://example.test".into(),
            method: Method::Get.to_string(),
            status,
            timeout: false,
            error: None,
            bytes_sent: 10,
            bytes_received: 20,
        }
    }

    #[test]
    fn empty_run_has_all_zero_numerics() {
        let report = Report::empty().finalize(SystemTime::now(), SystemTime::now());
        assert_eq!(report.total_requests, 0);
        assert_eq!(report.latency.min_ms, 0);
        assert_eq!(report.latency.max_ms, 0);
        assert_eq!(report.throughput.bytes_sent_per_second, 0.0);
    }

    #[test]
    fn percentiles_match_nearest_rank_spec_example() {
        // S5 from the spec: {100, 200, 300, 500, 1500} ms
        let mut report = Report::empty();
        for ms in [100, 200, 300, 500, 1500] {
            report.record(result_with_elapsed(ms, 200));
        }
        let start = SystemTime::now();
        let end = start + Duration::from_secs(1);
        let report = report.finalize(start, end);

        assert_eq!(report.latency.min_ms, 100);
        assert_eq!(report.latency.max_ms, 1500);
        assert_eq!(report.latency.mean_ms, 520.0);
        assert_eq!(report.latency.p50_ms, 300);
        assert_eq!(report.latency.p95_ms, 1500);
        assert_eq!(report.latency.p99_ms, 1500);
    }

    #[test]
    fn mixed_status_classification() {
        // S3 from the spec: {200, 500, 404, 200}
        let mut report = Report::empty();
        for status in [200, 500, 404, 200] {
            report.record(result_with_elapsed(10, status));
        }
        assert_eq!(report.status_histogram.s200, 2);
        assert_eq!(report.status_histogram.s500, 1);
        assert_eq!(report.status_histogram.s404, 1);
        assert_eq!(report.successes, 2);
        assert_eq!(report.failures, 2);
        assert_eq!(report.error_breakdown.client_errors, 1);
        assert_eq!(report.error_breakdown.server_errors, 1);
        assert_eq!(report.status_histogram.total(), report.total_requests);
    }
}
