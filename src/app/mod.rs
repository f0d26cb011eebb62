//! Desktop waterfall viewer
//!
//! The pipeline lives on the UI thread. Each `update` drains transport
//! events under a time budget, then gives the canvas one display tick.

mod header;
mod surface;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info};

use crate::config::WaterfallConfig;
use crate::core::colormap::build_color_table;
use crate::core::errors::RenderError;
use crate::core::ingest::StreamIngestor;
use crate::core::pipeline::Pipeline;
use crate::core::waterfall::WaterfallCanvas;
use crate::theme::{colors, minimal_visuals};
use crate::time::now_seconds;
use crate::websocket_native::{self, TransportEvents, WsTransport};

pub use header::FpsCounter;
pub use surface::TextureSurface;

/// Transport event processing budget per frame
const EVENT_BUDGET: Duration = Duration::from_millis(12);

pub struct WaterfallApp {
    pub(crate) pipeline: Pipeline<WsTransport, TextureSurface>,
    events: TransportEvents,
    pub(crate) fps_counter: FpsCounter,
}

impl WaterfallApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &WaterfallConfig) -> Result<Self, RenderError> {
        cc.egui_ctx.set_visuals(minimal_visuals());

        let canvas = WaterfallCanvas::new(config.width, config.height, Arc::new(build_color_table()))?
            .with_surface(TextureSurface::new(&cc.egui_ctx));

        let (transport, events) = websocket_native::connect_in_thread(&config.endpoint);
        let ingestor = StreamIngestor::connect(config.endpoint.clone(), transport);
        info!(url = %config.endpoint, width = config.width, height = config.height, "Viewer started");

        Ok(Self {
            pipeline: Pipeline::new(ingestor, canvas),
            events,
            fps_counter: FpsCounter::new(),
        })
    }

    /// Drain transport events; the rest stay queued for the next frame.
    fn process_events(&mut self) {
        let deadline = Instant::now() + EVENT_BUDGET;
        while let Ok(event) = self.events.try_recv() {
            self.pipeline.on_transport_event(event);
            if Instant::now() >= deadline {
                break;
            }
        }
    }

    fn render_waterfall(&self, ui: &mut egui::Ui) {
        let Some((texture_id, size)) = self.pipeline.canvas().surface().and_then(|s| s.texture()) else {
            ui.label(egui::RichText::new("Waiting for data...").color(colors::TEXT_MUTED));
            return;
        };
        let available = ui.available_size();
        let display = egui::vec2(available.x, available.x * size.y / size.x.max(1.0))
            .min(available);
        ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
            texture_id, display,
        )));
    }
}

impl eframe::App for WaterfallApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous repaint: one display tick per frame
        ctx.request_repaint();

        self.process_events();
        self.pipeline.on_tick();

        if let Some(rates) = self.pipeline.tick_diagnostics(now_seconds()) {
            debug!(
                frames_per_sec = rates.frames_per_sec,
                rejected_per_sec = rates.rejected_per_sec,
                coalesced_per_sec = rates.coalesced_per_sec,
                rows_per_sec = rates.rows_per_sec,
                "stats"
            );
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_waterfall(ui);
            });
    }
}

impl Drop for WaterfallApp {
    fn drop(&mut self) {
        self.pipeline.shutdown();
    }
}
