//! Convenience entry point: stand the benchmark server up for external load
//! generators (wrk, hey, ...) and tear it down on Ctrl+C.
//!
//! ```text
//! tracebench --host 127.0.0.1 --port 0
//! ```
//!
//! The bound address is logged after startup; port 0 asks the OS for an
//! ephemeral port so concurrent benchmark processes never collide.

use std::net::IpAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracebench::BenchServer;

#[derive(Parser)]
#[command(name = "tracebench")]
#[command(about = "HTTP tracing-overhead benchmark server", long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to bind; 0 picks an ephemeral port.
    #[arg(long, default_value_t = 0)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracebench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut server = BenchServer::new(args.host, args.port);
    let addr = server.start().await?;

    tracing::info!(
        address = %addr,
        "serving /nottraced /unsampled /traced /traced128 /tracedaws; Ctrl+C to stop"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    server.stop().await?;
    tracing::info!("shutdown complete");
    Ok(())
}
