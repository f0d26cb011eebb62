//! Mock PSD producer
//!
//! Serves synthetic WiFi/Bluetooth spectra over WebSocket so the viewer can
//! run without SDR hardware.
//!
//! Run with: cargo run --bin psd-mock -- --bind 127.0.0.1:8000

use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use psd_waterfall::mock::server::{run_server, MockServerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Stream synthetic PSD frames over WebSocket")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Close each connection after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Seed for reproducible spectra
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,psd_waterfall=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    let config = MockServerConfig {
        interval: Duration::from_millis(args.interval_ms.max(1)),
        max_frames: args.max_frames,
        seed: args.seed,
    };

    let listener = TcpListener::bind(&args.bind).await?;
    info!(bind = %args.bind, "Serving mock PSD frames at ws://{}/ws", args.bind);

    tokio::select! {
        result = run_server(listener, config) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}
