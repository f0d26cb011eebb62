//! Native WebSocket transport for the PSD stream
//!
//! Network I/O runs on a tokio task (or a background thread with its own
//! runtime, for the GUI). The pipeline side only sees two channels: outbound
//! messages through [`WsTransport`] and inbound [`TransportEvent`]s.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::core::errors::TransportError;
use crate::core::events::{CloseInfo, TransportEvent};
use crate::core::ingest::Transport;

/// Inbound half: transport callbacks in arrival order
pub type TransportEvents = UnboundedReceiver<TransportEvent>;

/// Outbound half, owned by the `StreamIngestor`
#[derive(Debug)]
pub struct WsTransport {
    outbound: UnboundedSender<Message>,
    closed: bool,
}

impl Transport for WsTransport {
    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.outbound
            .send(Message::Text(text.into()))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // Socket task may already be gone
        let _ = self.outbound.send(Message::Close(None));
    }
}

/// Open a connection on the current tokio runtime.
pub fn connect(url: &str) -> (WsTransport, TransportEvents) {
    let (transport, events, task) = channels(url);
    tokio::spawn(task.run());
    (transport, events)
}

/// Open a connection on a background thread with its own runtime.
///
/// For callers without a tokio runtime (the eframe viewer). The returned
/// receiver is polled with `try_recv`.
pub fn connect_in_thread(url: &str) -> (WsTransport, TransportEvents) {
    let (transport, events, task) = channels(url);
    let events_tx = task.events_tx.clone();

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "Failed to create tokio runtime");
                let _ = events_tx.send(TransportEvent::Error(e.to_string()));
                return;
            }
        };
        rt.block_on(task.run());
    });

    (transport, events)
}

struct SocketTask {
    url: String,
    events_tx: UnboundedSender<TransportEvent>,
    outbound_rx: UnboundedReceiver<Message>,
}

impl SocketTask {
    async fn run(self) {
        run_websocket(self.url, self.events_tx, self.outbound_rx).await;
    }
}

fn channels(url: &str) -> (WsTransport, TransportEvents, SocketTask) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let transport = WsTransport {
        outbound: outbound_tx,
        closed: false,
    };
    let task = SocketTask {
        url: url.to_string(),
        events_tx,
        outbound_rx,
    };
    (transport, events_rx, task)
}

async fn run_websocket(
    url: String,
    events_tx: UnboundedSender<TransportEvent>,
    mut outbound_rx: UnboundedReceiver<Message>,
) {
    info!(url = %url, "Connecting to WebSocket");

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => {
            info!("WebSocket connected");
            let _ = events_tx.send(TransportEvent::Opened);
            stream
        }
        Err(e) => {
            error!(error = %e, "Failed to connect");
            let _ = events_tx.send(TransportEvent::Error(e.to_string()));
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                let event = match msg {
                    Some(Ok(Message::Text(text))) => TransportEvent::Message(text.to_string()),
                    Some(Ok(Message::Close(frame))) => {
                        warn!("WebSocket closed by server");
                        let info = match frame {
                            Some(frame) => CloseInfo::clean(Some(u16::from(frame.code)), frame.reason.to_string()),
                            None => CloseInfo::clean(None, ""),
                        };
                        let _ = events_tx.send(TransportEvent::Closed(info));
                        // Push out the close reply tungstenite queued on read
                        if let Err(e) = write.flush().await {
                            debug!(error = %e, "Close reply not delivered");
                        }
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!(error = %e, "WebSocket error");
                        let _ = events_tx.send(TransportEvent::Error(e.to_string()));
                        break;
                    }
                    None => {
                        warn!("WebSocket stream ended");
                        let _ = events_tx.send(TransportEvent::Closed(CloseInfo::abnormal("stream ended")));
                        break;
                    }
                };
                if events_tx.send(event).is_err() {
                    // Receiver dropped, exit
                    break;
                }
            }
            out = outbound_rx.recv() => {
                // A dropped transport closes the socket too
                let msg = out.unwrap_or(Message::Close(None));
                let closing = matches!(msg, Message::Close(_));
                if let Err(e) = write.send(msg).await {
                    error!(error = %e, "Failed to send message");
                    let _ = events_tx.send(TransportEvent::Error(e.to_string()));
                    break;
                }
                if closing {
                    debug!("Close frame sent, stopping socket task");
                    break;
                }
            }
        }
    }
}
