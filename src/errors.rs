//! Error taxonomy for the load-generation engine.
//!
//! Pattern adapted from the reference codebase's `types::error` module:
//! one `thiserror` enum for library-internal failures, `anyhow` at the
//! binary boundary for user-facing context.

use thiserror::Error;

/// Errors that can be produced while building the request executor.
#[derive(Debug, Error)]
pub enum ExecutorInitError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),
}

/// Kind of failure a single request attempt can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutorErrorKind {
    #[error("request timed out")]
    Timeout,
    #[error("transport error")]
    Transport,
    #[error("protocol error")]
    Protocol,
    #[error("request build error")]
    RequestBuild,
}

/// Error returned by a single `Executor::execute` call.
#[derive(Debug, Error, Clone)]
#[error("{kind}: {message}")]
pub struct ExecutorError {
    pub kind: ExecutorErrorKind,
    pub message: String,
}

impl ExecutorError {
    pub fn new(kind: ExecutorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::Transport, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::Protocol, message)
    }

    pub fn request_build(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::RequestBuild, message)
    }
}

/// Errors raised while validating CLI / engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("url is required, specify it with --url")]
    MissingUrl,
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("body is required for POST/PUT requests")]
    MissingBody,
    #[error("requests must be greater than 0")]
    InvalidRequests,
    #[error("requests per second must be greater than 0")]
    InvalidRps,
    #[error("timeout must be greater than 0")]
    InvalidTimeout,
    #[error("invalid output format: {0} (expected raw, json, or yaml)")]
    InvalidOutputFormat(String),
    #[error("invalid header: {0} (expected \"Key: Value\")")]
    InvalidHeader(String),
    #[error("invalid resolver: {0} (expected \"host:ip:port\")")]
    InvalidResolver(String),
    #[error("http2 and a custom resolver cannot both be set")]
    Http2ResolverConflict,
}

/// The only error the engine driver surfaces to its caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to initialize request executor: {0}")]
    ExecutorInit(#[from] ExecutorInitError),
}
