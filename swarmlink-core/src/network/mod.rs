// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Keeps a single logical connection to a discovery/message node alive.
//!
//! # Architecture
//!
//! The network layer consists of:
//! - **Transport trait**: Platform-agnostic interface below the socket
//!   abstraction, reporting through an epoch-tagged event sink
//! - **Connection manager**: One driver task per logical connection with
//!   automatic reconnection after every close
//! - **Connection handler**: Caller callbacks for open, message, error and close
//! - **WebSocket transport**: Production transport over tokio-tungstenite
//! - **Mock transport**: Scriptable transport for tests
//!
//! # Example
//!
//! ```ignore
//! use swarmlink_core::network::{CallbackHandler, Connection};
//!
//! let handler = CallbackHandler::new().on_message(|frame| {
//!     println!("received {frame}");
//!     Ok(())
//! });
//! let connection = Connection::open("localhost:8546", handler)?;
//!
//! // `send` fails with NotConnected until the node accepts the socket
//! if connection.is_connected() {
//!     connection.send("hello")?;
//! }
//! connection.close();
//! ```

mod connection;
mod error;
mod handler;
mod mock;
mod transport;

#[cfg(feature = "network")]
mod websocket;

// Error types
pub use error::NetworkError;

// Transport abstraction
pub use transport::{
    server_url, Backoff, ConnectionConfig, ConnectionState, EpochEvent, EventReceiver,
    EventSender, EventSink, Transport, TransportEvent, TransportLink, TransportResult,
    CLOSE_ABNORMAL, CLOSE_NORMAL, DEFAULT_RECONNECT_DELAY_MS,
};

// Handler callbacks
pub use handler::{CallbackHandler, ConnectionHandler, HandlerResult, NoopHandler};

// Mock transport for testing
pub use mock::{MockAttempt, MockBehavior, MockTransport};

// WebSocket transport for production
#[cfg(feature = "network")]
pub use websocket::{WebSocketTransport, DEFAULT_CONNECT_TIMEOUT_MS};

// Connection management
pub use connection::Connection;
