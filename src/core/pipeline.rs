//! Single-threaded dispatcher tying ingestor, canvas and UI state together
//!
//! Drivers (the CLI loop, the GUI `update`) own one `Pipeline` and call it
//! from one thread: transport events in, display ticks in, nothing else.

use tracing::{debug, info};

use crate::ws_state::ConnectionStatus;

use super::errors::PipelineError;
use super::events::{PipelineEvent, TransportEvent};
use super::frame::Frame;
use super::ingest::{IngestStats, StreamIngestor, Transport};
use super::parser::ControlMessage;
use super::ui_state::UiState;
use super::waterfall::{CanvasStats, Headless, RenderSurface, WaterfallCanvas};

/// Per-second rates, computed from counter deltas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiagnosticsSnapshot {
    pub frames_per_sec: f64,
    pub rejected_per_sec: f64,
    pub coalesced_per_sec: f64,
    pub rows_per_sec: f64,
}

#[derive(Debug, Default)]
struct Diagnostics {
    last_tick: Option<f64>,
    last_ingest: IngestStats,
    last_canvas: CanvasStats,
    latest: DiagnosticsSnapshot,
}

pub struct Pipeline<T: Transport, S: RenderSurface = Headless> {
    ingestor: StreamIngestor<T>,
    canvas: WaterfallCanvas<S>,
    ui: UiState,
    /// Scratch event list, reused across dispatches
    events: Vec<PipelineEvent>,
    diagnostics: Diagnostics,
    torn_down: bool,
}

impl<T: Transport, S: RenderSurface> Pipeline<T, S> {
    pub fn new(ingestor: StreamIngestor<T>, canvas: WaterfallCanvas<S>) -> Self {
        Self {
            ingestor,
            canvas,
            ui: UiState::new(),
            events: Vec::new(),
            diagnostics: Diagnostics::default(),
            torn_down: false,
        }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn canvas(&self) -> &WaterfallCanvas<S> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut WaterfallCanvas<S> {
        &mut self.canvas
    }

    pub fn ingestor(&self) -> &StreamIngestor<T> {
        &self.ingestor
    }

    pub fn status(&self) -> ConnectionStatus {
        self.ingestor.status()
    }

    /// Feed one transport callback through the ingestor and route its output.
    pub fn on_transport_event(&mut self, event: TransportEvent) {
        if self.torn_down {
            return;
        }
        self.ingestor.handle(event, &mut self.events);
        self.dispatch();
    }

    /// Display refresh: draw at most one row.
    ///
    /// Returns true when a row was appended.
    pub fn on_tick(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        match self.canvas.on_tick() {
            Ok(drawn) => drawn,
            Err(e) => {
                self.events.push(PipelineEvent::Error(e.into()));
                self.dispatch();
                false
            }
        }
    }

    /// Ask the producer for a fresh frame.
    pub fn request_update(&mut self) -> Result<(), PipelineError> {
        if self.torn_down {
            return Err(PipelineError::NotConnected);
        }
        let result = self
            .ingestor
            .send(&ControlMessage::RequestUpdate, &mut self.events);
        self.dispatch();
        result
    }

    pub fn clear(&mut self) {
        if self.torn_down {
            return;
        }
        self.canvas.clear();
    }

    /// Schedule a locally built frame (e.g. mock data) without touching the wire.
    pub fn inject_frame(&mut self, frame: Frame) {
        if self.torn_down {
            return;
        }
        debug!("Injecting local frame");
        self.canvas.on_frame(frame);
    }

    /// Close the transport and drop pending draws. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.ingestor.shutdown();
        self.canvas.dispose();
        self.events.clear();
        info!(
            accepted = self.ingestor.stats().frames_accepted,
            rejected = self.ingestor.stats().frames_rejected,
            rows = self.canvas.stats().rows_drawn,
            "Pipeline shut down"
        );
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Recompute per-second rates when at least one second has passed since
    /// the last computation. `now` is in seconds.
    pub fn tick_diagnostics(&mut self, now: f64) -> Option<DiagnosticsSnapshot> {
        let ingest = self.ingestor.stats();
        let canvas = self.canvas.stats();
        let diag = &mut self.diagnostics;

        let Some(last) = diag.last_tick else {
            diag.last_tick = Some(now);
            diag.last_ingest = ingest;
            diag.last_canvas = canvas;
            return None;
        };

        let elapsed = now - last;
        if elapsed < 1.0 {
            return None;
        }

        let rate = |current: u64, previous: u64| current.saturating_sub(previous) as f64 / elapsed;
        diag.latest = DiagnosticsSnapshot {
            frames_per_sec: rate(ingest.frames_accepted, diag.last_ingest.frames_accepted),
            rejected_per_sec: rate(ingest.frames_rejected, diag.last_ingest.frames_rejected),
            coalesced_per_sec: rate(canvas.frames_coalesced, diag.last_canvas.frames_coalesced),
            rows_per_sec: rate(canvas.rows_drawn, diag.last_canvas.rows_drawn),
        };
        diag.last_tick = Some(now);
        diag.last_ingest = ingest;
        diag.last_canvas = canvas;
        Some(diag.latest)
    }

    /// Most recent per-second rates
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.latest
    }

    fn dispatch(&mut self) {
        for event in self.events.drain(..) {
            self.ui.apply(&event);
            if let PipelineEvent::Frame(frame) = event {
                self.canvas.on_frame(frame);
            }
        }
    }
}
