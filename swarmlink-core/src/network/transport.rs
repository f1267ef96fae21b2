// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Platform-agnostic abstraction for the socket below a logical connection.
//!
//! A [`Transport`] opens one underlying handle per connection epoch and
//! reports everything that happens to it through an [`EventSink`]. The
//! connection manager never calls back into the transport from inside an
//! event, so implementations are free to emit events synchronously from
//! `open` or later from their own tasks.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;

use super::error::NetworkError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Close code for a normal, caller-requested closure.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close code reported when a handle ends without a close frame
/// (refused connection, failed handshake, dropped socket).
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Connection state of a logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No live transport handle.
    Disconnected,
    /// A transport handle has been opened and is not yet established.
    Connecting,
    /// The live transport handle is established.
    Connected,
}

/// Something that happened to one transport handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The handle is established.
    Open,
    /// An inbound frame.
    Message(String),
    /// The handle reported an error. A terminal error is followed by `Close`.
    Error(String),
    /// The handle is gone, gracefully or not.
    Close { code: u16, reason: String },
}

/// A transport event tagged with the epoch of the handle that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochEvent {
    pub epoch: u64,
    pub event: TransportEvent,
}

/// Sender half shared by every sink of one connection.
pub type EventSender = mpsc::UnboundedSender<EpochEvent>;

/// Receiver half consumed by the connection driver.
pub type EventReceiver = mpsc::UnboundedReceiver<EpochEvent>;

/// Where a transport handle reports its events.
///
/// Each sink is bound to a single epoch; events emitted through a sink whose
/// epoch has ended are discarded by the connection.
#[derive(Debug, Clone)]
pub struct EventSink {
    epoch: u64,
    tx: EventSender,
}

impl EventSink {
    /// Creates a sink for `epoch` that forwards into `tx`.
    pub fn new(epoch: u64, tx: EventSender) -> Self {
        EventSink { epoch, tx }
    }

    /// Creates a sink together with a fresh receiver. Useful for driving a
    /// transport on its own.
    pub fn channel(epoch: u64) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink::new(epoch, tx), rx)
    }

    /// Returns the epoch this sink reports for.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Emits an event. Returns `false` once nobody is listening anymore.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(EpochEvent {
                epoch: self.epoch,
                event,
            })
            .is_ok()
    }

    /// Emits `Error(reason)` followed by an abnormal `Close`.
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.emit(TransportEvent::Error(reason.clone()));
        self.emit(TransportEvent::Close {
            code: CLOSE_ABNORMAL,
            reason,
        });
    }
}

/// Transport trait for the socket below a logical connection.
///
/// # Example
///
/// ```ignore
/// use swarmlink_core::network::{EventSink, MockTransport, Transport};
///
/// let transport = MockTransport::new();
/// let (sink, mut events) = EventSink::channel(1);
/// let mut link = transport.open("ws://localhost:8546/", sink)?;
/// link.send("hello")?;
/// link.close();
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Opens a new handle to `url`.
    ///
    /// Must not block: establishment is reported later through `events`.
    /// An `Err` here is treated like an immediate error followed by an
    /// abnormal close.
    fn open(&self, url: &str, events: EventSink) -> TransportResult<Box<dyn TransportLink>>;
}

/// One live transport handle.
pub trait TransportLink: Send {
    /// Queues `data` for transmission without waiting for network I/O.
    fn send(&mut self, data: &str) -> TransportResult<()>;

    /// Closes the handle.
    ///
    /// Safe to call more than once and after the handle already closed.
    fn close(&mut self);
}

/// Delay curve between reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay before every attempt.
    Constant(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Returns the delay before reconnect attempt `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Constant(delay) => delay,
            Backoff::Exponential { base, max } => {
                let shift = attempt.saturating_sub(1).min(31);
                base.saturating_mul(1u32 << shift).min(max)
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Constant(Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS))
    }
}

/// Delay before a reconnect attempt unless configured otherwise.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

/// Configuration for a logical connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Delay curve between reconnect attempts.
    pub backoff: Backoff,
    /// Random spread applied to each delay, as a fraction in `[0, 1]`.
    /// Values above 1 are capped; negative or non-finite values disable it.
    pub jitter: f64,
    /// Maximum consecutive reconnect attempts. `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            backoff: Backoff::default(),
            jitter: 0.0,
            max_reconnect_attempts: None,
        }
    }
}

impl ConnectionConfig {
    /// Creates a config with a constant reconnect delay.
    pub fn with_constant_delay(delay: Duration) -> Self {
        ConnectionConfig {
            backoff: Backoff::Constant(delay),
            ..Default::default()
        }
    }

    /// Creates a config with exponential backoff capped at `max`.
    pub fn with_exponential_backoff(base: Duration, max: Duration) -> Self {
        ConnectionConfig {
            backoff: Backoff::Exponential { base, max },
            ..Default::default()
        }
    }

    /// Returns the delay before reconnect attempt `attempt`, jitter applied.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let delay = self.backoff.delay(attempt);
        if !self.jitter.is_finite() || self.jitter <= 0.0 {
            return delay;
        }
        let jitter = self.jitter.min(1.0);
        let spread = rand::thread_rng().gen_range(-jitter..=jitter);
        delay.mul_f64(1.0 + spread)
    }

    /// Returns true if reconnect attempt `attempt` is still allowed.
    pub fn allows_attempt(&self, attempt: u32) -> bool {
        self.max_reconnect_attempts
            .map_or(true, |max| attempt <= max)
    }
}

/// Derives the transport URL for a bare `host:port` server address.
///
/// Addresses that already carry a `ws://` or `wss://` scheme are used as-is.
pub fn server_url(address: &str) -> TransportResult<String> {
    let address = address.trim();
    if address.starts_with("ws://") || address.starts_with("wss://") {
        return Ok(address.to_string());
    }
    if address.is_empty() || address.contains("://") || address.contains(char::is_whitespace) {
        return Err(NetworkError::InvalidAddress(address.to_string()));
    }
    Ok(format!("ws://{}/", address.trim_end_matches('/')))
}
