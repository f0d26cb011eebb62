//! Error taxonomy for the ingestion and rendering pipeline
//!
//! Every error is terminal at the component where it happens: it is turned
//! into a `PipelineEvent::Error` and shown to the user, never propagated as a
//! failure that stops the pipeline.

use thiserror::Error;

/// A frame that failed parsing or validation. The frame is dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Received malformed data: {0}")]
    Malformed(String),
    #[error("Invalid PSD data format: missing `{0}` field")]
    MissingField(&'static str),
    #[error("Invalid PSD data format: `psd` is not an array")]
    NotAnArray,
    #[error("Invalid PSD data format: expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Invalid PSD data format: value at index {index} is not a number")]
    NotANumber { index: usize },
    #[error("Invalid PSD data format: value {value} at index {index} is outside [0, 1]")]
    OutOfRange { index: usize, value: f64 },
}

/// Transport-level failure. Session-fatal: there is no reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("WebSocket encountered an error: {0}")]
    Transport(String),
    #[error("WebSocket connection lost (code {code:?}): {reason}")]
    AbnormalClose { code: Option<u16>, reason: String },
    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Failure while drawing into the waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Error drawing spectrogram: no surface attached")]
    SurfaceDetached,
    #[error("Error drawing spectrogram: frame has {len} values, need at least {width}")]
    FrameTooShort { len: usize, width: usize },
    #[error("Error drawing spectrogram: {0}")]
    Present(String),
    #[error("Invalid waterfall dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// Error raised by a [`Transport`](super::ingest::Transport) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("{0}")]
    Io(String),
}

/// Any error observable by the UI state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("WebSocket is not open. Cannot send message.")]
    NotConnected,
}

/// Coarse error category, used by the UI state to decide what is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Connection,
    Render,
    NotConnected,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::Connection(_) => ErrorKind::Connection,
            PipelineError::Render(_) => ErrorKind::Render,
            PipelineError::NotConnected => ErrorKind::NotConnected,
        }
    }
}

impl ErrorKind {
    /// Transient errors are cleared by the next valid frame.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Connection)
    }
}
