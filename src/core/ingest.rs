//! Stream ingestor: connection state machine, validation and forwarding
//!
//! The ingestor does no I/O of its own. A [`Transport`] carries outbound
//! text, and the transport's callbacks arrive as [`TransportEvent`]s through
//! [`StreamIngestor::handle`], one at a time, on the pipeline thread.

use tracing::{debug, error, info, trace, warn};

use crate::ws_state::ConnectionStatus;

use super::errors::{ConnectionError, PipelineError, TransportError};
use super::events::{CloseInfo, PipelineEvent, TransportEvent};
use super::parser::{parse_frame, ControlMessage};

/// Outbound half of a connection, owned exclusively by the ingestor.
pub trait Transport {
    /// Send one text message
    fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the connection. Must be idempotent.
    fn close(&mut self);
}

/// Ingest counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub frames_accepted: u64,
    pub frames_rejected: u64,
    pub messages_sent: u64,
}

/// Owns the transport and the connection status.
pub struct StreamIngestor<T: Transport> {
    endpoint: String,
    transport: Option<T>,
    status: ConnectionStatus,
    stats: IngestStats,
    torn_down: bool,
}

impl<T: Transport> StreamIngestor<T> {
    /// Take ownership of a transport that is opening a connection to `endpoint`.
    ///
    /// Status starts at `Connecting`; the transport reports `Opened` when ready.
    pub fn connect(endpoint: impl Into<String>, transport: T) -> Self {
        let endpoint = endpoint.into();
        info!(url = %endpoint, "Establishing WebSocket connection");
        Self {
            endpoint,
            transport: Some(transport),
            status: ConnectionStatus::Connecting,
            stats: IngestStats::default(),
            torn_down: false,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Single dispatch point for every transport callback.
    pub fn handle(&mut self, event: TransportEvent, out: &mut Vec<PipelineEvent>) {
        if self.torn_down {
            trace!(?event, "Ignoring transport event after teardown");
            return;
        }

        match event {
            TransportEvent::Opened => {
                info!(url = %self.endpoint, "Connected to WebSocket server");
                self.set_status(ConnectionStatus::Connected, out);
            }
            TransportEvent::Message(text) => self.on_message(&text, out),
            TransportEvent::Error(message) => {
                error!(error = %message, "WebSocket error");
                out.push(PipelineEvent::Error(
                    ConnectionError::Transport(message).into(),
                ));
                self.set_status(ConnectionStatus::Error, out);
            }
            TransportEvent::Closed(info) => self.on_close(info, out),
        }
    }

    fn on_message(&mut self, text: &str, out: &mut Vec<PipelineEvent>) {
        if !self.status.is_connected() {
            debug!(status = %self.status, "Dropping message received while not connected");
            return;
        }

        match parse_frame(text) {
            Ok(frame) => {
                self.stats.frames_accepted += 1;
                trace!(
                    classification = %frame.classification(),
                    accepted = self.stats.frames_accepted,
                    "Frame accepted"
                );
                let classification = frame.classification().clone();
                out.push(PipelineEvent::Frame(frame));
                out.push(PipelineEvent::ClassificationChanged(classification));
            }
            Err(e) => {
                self.stats.frames_rejected += 1;
                warn!(error = %e, rejected = self.stats.frames_rejected, "Invalid PSD data received");
                out.push(PipelineEvent::Error(e.into()));
            }
        }
    }

    fn on_close(&mut self, info: CloseInfo, out: &mut Vec<PipelineEvent>) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }

        if info.clean {
            info!(code = ?info.code, reason = %info.reason, "WebSocket connection closed cleanly");
            self.set_status(ConnectionStatus::Disconnected, out);
        } else {
            warn!(reason = %info.reason, "WebSocket connection died unexpectedly");
            out.push(PipelineEvent::Error(
                ConnectionError::AbnormalClose {
                    code: info.code,
                    reason: info.reason,
                }
                .into(),
            ));
            self.set_status(ConnectionStatus::Error, out);
        }
    }

    /// Send a control message. Only allowed while connected; nothing is queued.
    ///
    /// On failure the error is both returned and emitted for the UI.
    pub fn send(
        &mut self,
        message: &ControlMessage,
        out: &mut Vec<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        let result = self.try_send(message);
        match &result {
            Ok(()) => {
                self.stats.messages_sent += 1;
                debug!(?message, "Message sent via WebSocket");
            }
            Err(e) => {
                warn!(error = %e, ?message, "Message not sent");
                out.push(PipelineEvent::Error(e.clone()));
            }
        }
        result
    }

    fn try_send(&mut self, message: &ControlMessage) -> Result<(), PipelineError> {
        if self.torn_down || !self.status.is_connected() {
            return Err(PipelineError::NotConnected);
        }
        let transport = self.transport.as_mut().ok_or(PipelineError::NotConnected)?;
        let text = message
            .to_json()
            .map_err(|e| ConnectionError::Send(e.to_string()))?;
        transport
            .send_text(text)
            .map_err(|e| ConnectionError::Send(e.to_string()).into())
    }

    /// Close and release the transport. No handler runs after this returns.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            info!(url = %self.endpoint, "WebSocket connection closed");
        }
        self.status = ConnectionStatus::Disconnected;
    }

    fn set_status(&mut self, status: ConnectionStatus, out: &mut Vec<PipelineEvent>) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "Connection status changed");
            self.status = status;
            out.push(PipelineEvent::StatusChanged(status));
        }
    }
}

impl<T: Transport> Drop for StreamIngestor<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
