//! Events flowing through the pipeline
//!
//! - `TransportEvent`: the four callback kinds a transport reports
//! - `PipelineEvent`: what the ingestor and canvas emit for the renderer and UI state

use crate::ws_state::ConnectionStatus;

use super::errors::PipelineError;
use super::frame::{Classification, Frame};

/// Details of a transport close
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloseInfo {
    /// Closing handshake completed
    pub clean: bool,
    pub code: Option<u16>,
    pub reason: String,
}

impl CloseInfo {
    pub fn clean(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            clean: true,
            code,
            reason: reason.into(),
        }
    }

    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self {
            clean: false,
            code: None,
            reason: reason.into(),
        }
    }
}

/// Transport lifecycle callback, dispatched through `StreamIngestor::handle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed(CloseInfo),
}

/// Event emitted by the ingestor or canvas
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StatusChanged(ConnectionStatus),
    /// Validated frame, consumed by the waterfall canvas
    Frame(Frame),
    ClassificationChanged(Classification),
    Error(PipelineError),
}
