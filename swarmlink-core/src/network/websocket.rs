// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Transport
//!
//! Real transport implementation using tokio-tungstenite. Each opened handle
//! runs on its own task; the returned link only queues frames for it.
//! TLS (`wss://`) needs the `network-native-tls` or `network-rustls` feature.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use super::error::NetworkError;
use super::transport::{
    EventSink, Transport, TransportEvent, TransportLink, TransportResult, CLOSE_ABNORMAL,
    CLOSE_NORMAL,
};

/// Default time allowed for the TCP + WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// WebSocket transport for node communication.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use swarmlink_core::network::{Connection, ConnectionConfig, NoopHandler, WebSocketTransport};
///
/// let transport = WebSocketTransport::new().with_connect_timeout(Duration::from_secs(3));
/// let connection = Connection::open_with(
///     transport,
///     "localhost:8546",
///     NoopHandler,
///     ConnectionConfig::default(),
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    connect_timeout: Duration,
}

impl WebSocketTransport {
    /// Creates a new WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport {
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }

    /// Sets the handshake timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Returns the handshake timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, url: &str, events: EventSink) -> TransportResult<Box<dyn TransportLink>> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(NetworkError::InvalidAddress(
                "Invalid URL scheme (expected ws:// or wss://)".into(),
            ));
        }

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(
            url.to_string(),
            self.connect_timeout,
            events,
            outgoing_rx,
        ));

        Ok(Box::new(WebSocketLink {
            outgoing: outgoing_tx,
        }))
    }
}

enum Outgoing {
    Text(String),
    Close,
}

struct WebSocketLink {
    outgoing: mpsc::UnboundedSender<Outgoing>,
}

impl TransportLink for WebSocketLink {
    fn send(&mut self, data: &str) -> TransportResult<()> {
        self.outgoing
            .send(Outgoing::Text(data.to_string()))
            .map_err(|_| NetworkError::ConnectionClosed)
    }

    fn close(&mut self) {
        // The socket task may already have finished.
        let _ = self.outgoing.send(Outgoing::Close);
    }
}

/// Drives one WebSocket from handshake to close, reporting through `events`.
async fn run_socket(
    url: String,
    connect_timeout: Duration,
    events: EventSink,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
) {
    let stream = match timeout(connect_timeout, tokio_tungstenite::connect_async(url.as_str())).await {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(e)) => {
            events.fail(format!("WebSocket handshake failed: {}", e));
            return;
        }
        Err(_) => {
            events.fail(NetworkError::Timeout.to_string());
            return;
        }
    };

    events.emit(TransportEvent::Open);
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            command = outgoing.recv() => match command {
                Some(Outgoing::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        events.fail(format!("Message send failed: {}", e));
                        return;
                    }
                }
                Some(Outgoing::Close) | None => {
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "".into(),
                    };
                    let _ = write.send(Message::Close(Some(frame))).await;
                    events.emit(TransportEvent::Close {
                        code: CLOSE_NORMAL,
                        reason: String::new(),
                    });
                    return;
                }
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    events.emit(TransportEvent::Message(text));
                }
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                    Ok(text) => {
                        events.emit(TransportEvent::Message(text));
                    }
                    Err(_) => warn!("Dropping non UTF-8 binary frame from {}", url),
                },
                // tungstenite answers pings itself.
                Some(Ok(Message::Ping(_)))
                | Some(Ok(Message::Pong(_)))
                | Some(Ok(Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = close_details(frame);
                    debug!("Peer {} sent close {}", url, code);
                    events.emit(TransportEvent::Close { code, reason });
                    return;
                }
                Some(Err(e)) => {
                    events.fail(format!("Message receive failed: {}", e));
                    return;
                }
                None => {
                    events.emit(TransportEvent::Close {
                        code: CLOSE_ABNORMAL,
                        reason: "Connection closed".into(),
                    });
                    return;
                }
            },
        }
    }
}

fn close_details(frame: Option<CloseFrame<'_>>) -> (u16, String) {
    match frame {
        Some(frame) => (u16::from(frame.code), frame.reason.into_owned()),
        None => (CLOSE_NORMAL, String::new()),
    }
}
