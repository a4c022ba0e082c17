//! Concurrent HTTP load-generation engine.
//!
//! Given a target URL, a total request count, and a target requests-per-second
//! rate, drives a bounded worker pool through a rate-limiting pacer and
//! aggregates per-request outcomes into a [`report::Report`] carrying
//! latency percentiles, throughput, and error classification.

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod job;
pub mod logging;
pub mod pacer;
pub mod report;
pub mod result;
pub mod serialize;
pub mod testserver;
pub mod worker;

pub use config::CliArgs;
pub use engine::{run, EngineConfig};
pub use errors::EngineError;
pub use report::Report;
