//! Structured logging setup for the load-generation engine.
//!
//! A leveled sink only — nothing in the engine branches on whether logging
//! succeeded.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a global `tracing` subscriber honoring `RUST_LOG`, falling back
/// to `yahba_rs=<level>,info` when unset.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("yahba_rs={log_level},info").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
