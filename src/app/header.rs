//! Header bar: status, classification badge, controls

use eframe::egui;
use tracing::warn;

use super::WaterfallApp;
use crate::core::frame::Frame;
use crate::theme::{colors, status_color, to_color32};
use crate::time::now_seconds;

/// Uniform level used by the "Draw Mock Data" control
const MOCK_LEVEL: f32 = 0.5;

impl WaterfallApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        let ui_state = self.pipeline.ui().clone();
        let status = ui_state.connection_status();

        ui.horizontal(|ui| {
            // LEFT: controls
            if ui.button("Clear").clicked() {
                self.pipeline.clear();
            }

            if ui.button("Request Update").clicked() {
                if let Err(e) = self.pipeline.request_update() {
                    warn!(error = %e, "Request update failed");
                }
            }

            if ui.button("Draw Mock Data").clicked() {
                self.pipeline.inject_frame(Frame::uniform(MOCK_LEVEL));
            }

            // RIGHT: status, classification, fps (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(status_color(status), status.label());
                ui.add_space(10.0);

                let badge = egui::RichText::new(ui_state.classification().label())
                    .color(colors::TEXT_PRIMARY)
                    .background_color(to_color32(ui_state.classification_color()));
                ui.label(badge);
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                let rates = self.pipeline.diagnostics();
                ui.label(
                    egui::RichText::new(format!("{:.1} frames/s", rates.frames_per_sec))
                        .color(colors::TEXT_MUTED),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                        .color(colors::TEXT_SECONDARY),
                );
            });
        });

        if let Some(error) = ui_state.error_text() {
            ui.colored_label(colors::STATUS_BAD, error);
        }
    }
}

/// FPS counter over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        self.record(now_seconds());
    }

    fn record(&mut self, now: f64) {
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
