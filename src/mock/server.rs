//! WebSocket server streaming mock PSD frames
//!
//! Every client gets its own [`MockSource`]. Frames go out on a fixed
//! interval; a `request_update` control message triggers one immediately.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{accept_async, tungstenite, tungstenite::Message, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::MockSource;
use crate::core::parser::ControlMessage;

/// How long to wait for the client's close reply
const CLOSE_GRACE: Duration = Duration::from_secs(1);

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct MockServerConfig {
    /// Period between broadcast frames
    pub interval: Duration,
    /// Close the connection cleanly after this many frames
    pub max_frames: Option<u64>,
    /// Seed for reproducible spectra; per-connection seeds are derived from it
    pub seed: Option<u64>,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_frames: None,
            seed: None,
        }
    }
}

/// Accept clients forever, one task per connection.
pub async fn run_server(listener: TcpListener, config: MockServerConfig) -> std::io::Result<()> {
    let local = listener.local_addr()?;
    info!(addr = %local, interval_ms = config.interval.as_millis() as u64, "Mock PSD server listening");

    let mut connections = 0u64;
    loop {
        let (stream, peer) = listener.accept().await?;
        connections += 1;
        let source = match config.seed {
            Some(seed) => MockSource::with_seed(seed.wrapping_add(connections)),
            None => MockSource::new(),
        };
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream, peer, source, config).await {
                warn!(peer = %peer, error = %e, "Client connection failed");
            }
        });
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    mut source: MockSource,
    config: MockServerConfig,
) -> Result<(), ServeError> {
    let ws_stream = accept_async(stream).await?;
    info!(peer = %peer, "Client connected");
    let (mut write, mut read) = ws_stream.split();

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sent = 0u64;

    loop {
        if config.max_frames.is_some_and(|max| sent >= max) {
            info!(peer = %peer, frames = sent, "Frame limit reached, closing");
            write
                .send(Message::Close(Some(CloseFrame {
                    code: CloseCode::Normal,
                    reason: "stream complete".into(),
                })))
                .await?;
            // Wait for the close reply so the client sees a clean shutdown
            let _ = tokio::time::timeout(CLOSE_GRACE, async {
                while let Some(Ok(msg)) = read.next().await {
                    if msg.is_close() {
                        break;
                    }
                }
            })
            .await;
            return Ok(());
        }

        tokio::select! {
            _ = ticker.tick() => {
                send_frame(&mut write, &mut source).await?;
                sent += 1;
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ControlMessage>(&text) {
                            Ok(ControlMessage::RequestUpdate) => {
                                debug!(peer = %peer, "Update requested");
                                send_frame(&mut write, &mut source).await?;
                                sent += 1;
                            }
                            Err(e) => warn!(peer = %peer, error = %e, "Unknown control message"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(peer = %peer, frames = sent, "Client disconnected");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!(peer = %peer, error = %e, "WebSocket error");
                        return Err(e.into());
                    }
                }
            }
        }
    }
}

async fn send_frame(write: &mut WsSink, source: &mut MockSource) -> Result<(), ServeError> {
    let text = source.next_message()?;
    write.send(Message::Text(text.into())).await?;
    Ok(())
}
