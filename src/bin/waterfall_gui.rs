//! Desktop waterfall viewer
//!
//! Run with: cargo run --features gui --bin waterfall-gui -- --url ws://localhost:8000/ws

use clap::Parser;
use eframe::egui;
use tracing_subscriber::{fmt, EnvFilter};

use psd_waterfall::app::WaterfallApp;
use psd_waterfall::config::CliArgs;

/// Room for the header bar above the waterfall
const HEADER_HEIGHT: f32 = 56.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,psd_waterfall=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = CliArgs::parse().into_config()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PSD Waterfall")
            .with_inner_size([config.width as f32, config.height as f32 + HEADER_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "PSD Waterfall",
        options,
        Box::new(move |cc| Ok(Box::new(WaterfallApp::new(cc, &config)?))),
    )?;
    Ok(())
}
