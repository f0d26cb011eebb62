//! PSD waterfall - real-time spectrogram viewer for streamed power spectral density frames
//!
//! Frames arrive over a WebSocket as JSON, are validated, downsampled to the
//! display width, color-mapped and pushed into a scrolling waterfall buffer.
//!
//! - `core`: platform-agnostic pipeline (parser, ingestor, canvas, UI state)
//! - `websocket_native`: tokio-tungstenite transport (feature `native`)
//! - `mock`: synthetic PSD producer for local testing
//! - `app`: eframe/egui viewer (feature `gui`)

pub mod config;
pub mod core;
pub mod mock;
pub mod time;
pub mod ws_state;

#[cfg(feature = "native")]
pub mod websocket_native;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod theme;

pub use config::{ConfigError, WaterfallConfig, DEFAULT_WS_URL};
pub use ws_state::ConnectionStatus;
