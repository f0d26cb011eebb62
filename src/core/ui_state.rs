//! Reactive UI state: connection status, classification, last error
//!
//! Nothing here changes on its own. Every field is written by `apply` in
//! response to an event raised by the ingestor or the canvas.

use crate::ws_state::ConnectionStatus;

use super::colormap::Rgba;
use super::errors::ErrorKind;
use super::events::PipelineEvent;
use super::frame::Classification;

/// Badge colors per classification
pub mod badge {
    use super::Rgba;

    pub const WIFI: Rgba = [0x1E, 0x88, 0xE5, 255]; // #1E88E5 - blue
    pub const BLUETOOTH: Rgba = [0x43, 0xA0, 0x47, 255]; // #43A047 - green
    pub const NEUTRAL: Rgba = [0x75, 0x75, 0x75, 255]; // #757575 - gray
}

/// Display color for a classification badge
pub fn classification_color(classification: &Classification) -> Rgba {
    match classification {
        Classification::WiFi => badge::WIFI,
        Classification::Bluetooth => badge::BLUETOOTH,
        _ => badge::NEUTRAL,
    }
}

/// User-visible error text with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    connection_status: ConnectionStatus,
    classification: Classification,
    last_error: Option<ErrorNotice>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StatusChanged(status) => {
                self.connection_status = *status;
                if status.is_connected() {
                    self.last_error = None;
                }
            }
            PipelineEvent::ClassificationChanged(classification) => {
                self.classification = classification.clone();
            }
            PipelineEvent::Frame(_) => {
                if self
                    .last_error
                    .as_ref()
                    .is_some_and(|notice| notice.kind.is_transient())
                {
                    self.last_error = None;
                }
            }
            PipelineEvent::Error(error) => {
                self.last_error = Some(ErrorNotice {
                    kind: error.kind(),
                    message: error.to_string(),
                });
            }
        }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn classification_color(&self) -> Rgba {
        classification_color(&self.classification)
    }

    pub fn last_error(&self) -> Option<&ErrorNotice> {
        self.last_error.as_ref()
    }

    pub fn error_text(&self) -> Option<&str> {
        self.last_error.as_ref().map(|notice| notice.message.as_str())
    }
}
