//! Headless waterfall viewer
//!
//! Connects to a PSD producer, runs the full pipeline against an offscreen
//! buffer and logs throughput.
//!
//! Run with: cargo run --bin waterfall-cli -- --url ws://localhost:8000/ws

use std::sync::Arc;

use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use psd_waterfall::config::CliArgs;
use psd_waterfall::core::{build_color_table, Headless, Pipeline, StreamIngestor, WaterfallCanvas};
use psd_waterfall::time::now_seconds;
use psd_waterfall::websocket_native;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,psd_waterfall=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = CliArgs::parse();
    let request_on_open = args.request_update;
    let config = args.into_config()?;

    info!(
        url = %config.endpoint,
        width = config.width,
        height = config.height,
        refresh_hz = config.refresh_hz,
        "Starting waterfall"
    );

    let (transport, mut events) = websocket_native::connect(&config.endpoint);
    let ingestor = StreamIngestor::connect(config.endpoint.clone(), transport);
    let canvas = WaterfallCanvas::new(config.width, config.height, Arc::new(build_color_table()))?
        .with_surface(Headless);
    let mut pipeline = Pipeline::new(ingestor, canvas);

    let mut refresh = tokio::time::interval(config.tick_interval());
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats_interval = tokio::time::interval(config.stats_interval);
    stats_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut requested = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    warn!("Transport task ended");
                    break;
                };
                pipeline.on_transport_event(event);

                let status = pipeline.status();
                if request_on_open && !requested && status.is_connected() {
                    requested = true;
                    if let Err(e) = pipeline.request_update() {
                        warn!(error = %e, "Failed to request update");
                    }
                }
                if status.is_terminal() {
                    info!(status = %status, "Connection finished");
                    break;
                }
            }
            _ = refresh.tick() => {
                pipeline.on_tick();
                pipeline.tick_diagnostics(now_seconds());
            }
            _ = stats_interval.tick() => {
                let ingest = pipeline.ingestor().stats();
                let canvas = pipeline.canvas().stats();
                let rates = pipeline.diagnostics();
                info!(
                    status = %pipeline.status(),
                    classification = %pipeline.ui().classification(),
                    frames = ingest.frames_accepted,
                    rejected = ingest.frames_rejected,
                    rows = canvas.rows_drawn,
                    coalesced = canvas.frames_coalesced,
                    "/sec" = format!("{:.1}", rates.frames_per_sec),
                    "stats"
                );
                if let Some(error) = pipeline.ui().error_text() {
                    warn!(error, "Last error");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    pipeline.shutdown();
    Ok(())
}
