//! yahba-rs — concurrent HTTP load-generation tool.

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use yahba_rs::config::CliArgs;
use yahba_rs::errors::EngineError;
use yahba_rs::serialize::serialize;
use yahba_rs::{engine, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    logging::init(&args.log_level);

    if let Err(e) = args.validate() {
        error!("configuration error: {}", e);
        std::process::exit(1);
    }

    if args.server {
        return run_test_server(args.server_listen).await;
    }

    let engine_config = args
        .build_engine_config()
        .map_err(EngineError::from)
        .context("failed to build request executor")?;
    let jobs = args.jobs();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received interrupt, shutting down");
            let _ = cancel_tx.send(true);
        }
    });

    info!(
        url = %args.url.as_deref().unwrap_or(""),
        requests = args.requests,
        rps = args.rps,
        "starting load test"
    );

    let report = engine::run(engine_config, jobs, cancel_rx).await;
    println!("{}", serialize(&report, args.output_format()));

    Ok(())
}

async fn run_test_server(listen: std::net::SocketAddr) -> anyhow::Result<()> {
    info!(%listen, "starting test target server");
    yahba_rs::testserver::serve(listen).await
}
