//! Outcome of one attempted request.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::errors::{ExecutorError, ExecutorErrorKind};
use crate::job::Method;

/// Error indicator attached to a failed [`RequestResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ResultError {
    pub kind: String,
    pub message: String,
}

impl From<&ExecutorError> for ResultError {
    fn from(err: &ExecutorError) -> Self {
        let kind = match err.kind {
            ExecutorErrorKind::Timeout => "timeout",
            ExecutorErrorKind::Transport => "transport",
            ExecutorErrorKind::Protocol => "protocol",
            ExecutorErrorKind::RequestBuild => "request_build",
        };
        Self {
            kind: kind.to_string(),
            message: err.message.clone(),
        }
    }
}

/// Outcome of one attempted request.
///
/// Created by a worker, consumed exactly once by the aggregator.
/// `start`/`end` are monotonic (`Instant`) and are not serialized directly;
/// `elapsed` is the serialized, percentile-bearing measurement.
#[derive(Debug, Clone, Serialize)]
pub struct RequestResult {
    pub worker_id: usize,
    #[serde(skip)]
    pub start: Instant,
    #[serde(skip)]
    pub end: Instant,
    pub elapsed_ms: u128,
    pub target_url: String,
    pub method: String,
    /// Resolved HTTP status code; 0 if no response was received.
    pub status: u16,
    pub timeout: bool,
    pub error: Option<ResultError>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl RequestResult {
    pub fn elapsed(&self) -> Duration {
        debug_assert!(self.end >= self.start);
        self.end.duration_since(self.start)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status < 400
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn is_timeout(&self) -> bool {
        self.timeout || self.status == 408
    }

    pub(crate) fn builder(worker_id: usize, target_url: String, method: Method) -> ResultBuilder {
        ResultBuilder {
            worker_id,
            target_url,
            method,
            start: Instant::now(),
        }
    }
}

/// Builds a [`RequestResult`] across the stages of one job's lifecycle,
/// so `start` is captured once and every exit path records a consistent `end`.
pub(crate) struct ResultBuilder {
    worker_id: usize,
    target_url: String,
    method: Method,
    start: Instant,
}

impl ResultBuilder {
    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn success(self, status: u16, bytes_sent: u64, bytes_received: u64) -> RequestResult {
        let end = Instant::now();
        RequestResult {
            worker_id: self.worker_id,
            elapsed_ms: end.duration_since(self.start).as_millis(),
            start: self.start,
            end,
            target_url: self.target_url,
            method: self.method.to_string(),
            status,
            timeout: false,
            error: None,
            bytes_sent,
            bytes_received,
        }
    }

    pub fn failure(self, err: &ExecutorError, bytes_sent: u64) -> RequestResult {
        let end = Instant::now();
        let timeout = err.kind == ExecutorErrorKind::Timeout;
        RequestResult {
            worker_id: self.worker_id,
            elapsed_ms: end.duration_since(self.start).as_millis(),
            start: self.start,
            end,
            target_url: self.target_url,
            method: self.method.to_string(),
            status: if timeout { 408 } else { 0 },
            timeout,
            error: Some(err.into()),
            bytes_sent,
            bytes_received: 0,
        }
    }
}
