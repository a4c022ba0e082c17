//! Standalone entry point for the built-in HTTP test target server.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "yahba-testserver")]
#[command(about = "Standalone HTTP target server for exercising yahba-rs")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "YAHBA_SERVER_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "YAHBA_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    yahba_rs::logging::init(&args.log_level);
    yahba_rs::testserver::serve(args.listen).await
}
