// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Manager
//!
//! Keeps one logical connection to a node alive over an unreliable
//! transport, re-establishing it after every close until the caller closes
//! it explicitly.
//!
//! Each connection is driven by a single task that owns the reconnect timer
//! and consumes transport events in order. The state shared with callers
//! (`send`, `close`, introspection) sits behind one mutex that is never held
//! while a handler callback runs.
//!
//! Callbacks run under a separate delivery gate that `close` also takes, so
//! once `close` returns no callback is running or will start. A `close` made
//! from inside a callback skips the gate.

use std::future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{self, Sleep};
use tracing::{debug, info, warn};

use super::error::NetworkError;
use super::handler::{ConnectionHandler, HandlerResult};
use super::transport::{
    server_url, ConnectionConfig, ConnectionState, EpochEvent, EventReceiver, EventSender,
    EventSink, Transport, TransportEvent, TransportLink, TransportResult,
};

#[cfg(feature = "network")]
use super::websocket::WebSocketTransport;

/// State shared between the driver task and caller-facing handles.
struct Shared {
    state: ConnectionState,
    link: Option<Box<dyn TransportLink>>,
    /// Epoch of the most recently opened transport handle.
    epoch: u64,
    reconnect_pending: bool,
    closed: bool,
}

impl Shared {
    fn new() -> Self {
        Shared {
            state: ConnectionState::Disconnected,
            link: None,
            epoch: 0,
            reconnect_pending: false,
            closed: false,
        }
    }

    /// Marks the connection closed and hands back the live link, if any.
    fn close(&mut self) -> Option<Box<dyn TransportLink>> {
        self.closed = true;
        self.reconnect_pending = false;
        self.state = ConnectionState::Disconnected;
        self.link.take()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serializes handler callbacks against `close`.
#[derive(Default)]
struct DeliveryGate {
    gate: Mutex<()>,
    /// Thread currently running a callback, if any.
    owner: Mutex<Option<ThreadId>>,
}

impl DeliveryGate {
    /// Waits for a running callback to finish, unless called from inside it.
    fn enter_from_caller(&self) -> Option<MutexGuard<'_, ()>> {
        if *lock(&self.owner) == Some(thread::current().id()) {
            return None;
        }
        Some(lock(&self.gate))
    }
}

enum Command {
    Close,
}

struct ConnectionInner {
    url: String,
    shared: Arc<Mutex<Shared>>,
    delivery: Arc<DeliveryGate>,
    commands: mpsc::UnboundedSender<Command>,
}

/// A logical connection to one server address.
///
/// Cloning is cheap; all clones refer to the same connection. When the last
/// clone is dropped the connection shuts down as if [`close`](Self::close)
/// had been called.
///
/// # Example
///
/// ```ignore
/// use swarmlink_core::network::{CallbackHandler, Connection};
///
/// let handler = CallbackHandler::new()
///     .on_open(|| println!("connected"))
///     .on_message(|message| {
///         println!("received {message}");
///         Ok(())
///     });
///
/// let connection = Connection::open("localhost:8546", handler)?;
/// // ... later, once connected
/// connection.send("hello")?;
/// connection.close();
/// ```
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Opens a logical connection over WebSocket with the default config.
    ///
    /// Returns immediately; the first attempt starts on the current tokio
    /// runtime.
    #[cfg(feature = "network")]
    pub fn open<H: ConnectionHandler>(server_address: &str, handler: H) -> TransportResult<Self> {
        Self::open_with(
            WebSocketTransport::new(),
            server_address,
            handler,
            ConnectionConfig::default(),
        )
    }

    /// Opens a logical connection over `transport`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open_with<T, H>(
        transport: T,
        server_address: &str,
        handler: H,
        config: ConnectionConfig,
    ) -> TransportResult<Self>
    where
        T: Transport,
        H: ConnectionHandler,
    {
        let url = server_url(server_address)?;
        let runtime = Handle::try_current()
            .map_err(|e| NetworkError::ConnectionFailed(format!("No async runtime: {}", e)))?;

        let shared = Arc::new(Mutex::new(Shared::new()));
        let delivery = Arc::new(DeliveryGate::default());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            url: url.clone(),
            transport,
            handler,
            config,
            shared: shared.clone(),
            delivery: delivery.clone(),
            events_tx,
            events: events_rx,
            commands: commands_rx,
            reconnect: None,
            attempt: 0,
        };
        runtime.spawn(driver.run());

        Ok(Connection {
            inner: Arc::new(ConnectionInner {
                url,
                shared,
                delivery,
                commands: commands_tx,
            }),
        })
    }

    /// Sends `data` over the live transport.
    ///
    /// Fails with [`NetworkError::NotConnected`] while no transport is
    /// established and with [`NetworkError::Closed`] after [`close`](Self::close).
    /// Nothing is queued for later delivery.
    pub fn send(&self, data: &str) -> TransportResult<()> {
        let mut shared = lock(&self.inner.shared);
        if shared.closed {
            return Err(NetworkError::Closed);
        }
        if shared.state != ConnectionState::Connected {
            return Err(NetworkError::NotConnected);
        }
        let link = shared.link.as_mut().ok_or(NetworkError::NotConnected)?;
        debug!("Sending {} bytes to {}", data.len(), self.inner.url);
        link.send(data)
    }

    /// Closes the connection permanently.
    ///
    /// Cancels a pending reconnect and closes the live transport. Safe to
    /// call any number of times, including from inside a handler callback.
    /// Blocks while a callback is running on another thread; after it returns
    /// no callback runs again.
    pub fn close(&self) {
        let _gate = self.inner.delivery.enter_from_caller();
        let link = {
            let mut shared = lock(&self.inner.shared);
            if shared.closed {
                return;
            }
            shared.close()
        };
        info!("Closing connection to {}", self.inner.url);
        if let Some(mut link) = link {
            link.close();
        }
        // The driver may already be gone.
        let _ = self.inner.commands.send(Command::Close);
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        lock(&self.inner.shared).state
    }

    /// Returns true if connected and ready to send.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        lock(&self.inner.shared).closed
    }

    /// Returns true while a reconnect attempt is scheduled.
    pub fn is_reconnect_pending(&self) -> bool {
        lock(&self.inner.shared).reconnect_pending
    }

    /// Returns the transport URL derived from the server address.
    pub fn server_url(&self) -> &str {
        &self.inner.url
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = lock(&self.inner.shared);
        f.debug_struct("Connection")
            .field("url", &self.inner.url)
            .field("state", &shared.state)
            .field("epoch", &shared.epoch)
            .field("reconnect_pending", &shared.reconnect_pending)
            .field("closed", &shared.closed)
            .finish()
    }
}

/// Task that owns the transport, the handler and the reconnect timer.
struct Driver<T: Transport, H: ConnectionHandler> {
    url: String,
    transport: T,
    handler: H,
    config: ConnectionConfig,
    shared: Arc<Mutex<Shared>>,
    delivery: Arc<DeliveryGate>,
    events_tx: EventSender,
    events: EventReceiver,
    commands: mpsc::UnboundedReceiver<Command>,
    reconnect: Option<Pin<Box<Sleep>>>,
    /// Consecutive failed epochs since the last successful open.
    attempt: u32,
}

impl<T: Transport, H: ConnectionHandler> Driver<T, H> {
    async fn run(mut self) {
        self.start_attempt();

        loop {
            tokio::select! {
                biased;

                // `None` means every `Connection` handle was dropped.
                _ = self.commands.recv() => {
                    self.shutdown();
                    break;
                }
                Some(event) = self.events.recv() => {
                    self.handle_event(event);
                }
                () = reconnect_due(&mut self.reconnect), if self.reconnect.is_some() => {
                    self.reconnect = None;
                    self.start_attempt();
                }
            }
        }
    }

    /// disconnected -> connecting.
    fn start_attempt(&mut self) {
        self.reconnect = None;

        let sink = {
            let mut shared = lock(&self.shared);
            shared.reconnect_pending = false;
            if shared.closed || shared.state != ConnectionState::Disconnected {
                return;
            }
            shared.epoch += 1;
            shared.state = ConnectionState::Connecting;
            EventSink::new(shared.epoch, self.events_tx.clone())
        };
        let epoch = sink.epoch();

        info!("Connecting to {} (epoch {})", self.url, epoch);

        match self.transport.open(&self.url, sink) {
            Ok(mut link) => {
                let mut shared = lock(&self.shared);
                if shared.closed || shared.epoch != epoch {
                    drop(shared);
                    link.close();
                    return;
                }
                shared.link = Some(link);
            }
            Err(e) => {
                warn!("Failed to open transport to {}: {}", self.url, e);
                EventSink::new(epoch, self.events_tx.clone()).fail(e.to_string());
            }
        }
    }

    fn handle_event(&mut self, EpochEvent { epoch, event }: EpochEvent) {
        let state = {
            let shared = lock(&self.shared);
            if shared.closed {
                debug!("Dropping {:?} for closed connection to {}", event, self.url);
                return;
            }
            if shared.epoch != epoch {
                debug!("Dropping stale {:?} from epoch {}", event, epoch);
                return;
            }
            shared.state
        };

        match event {
            TransportEvent::Open => self.on_open(epoch),
            TransportEvent::Message(message) => {
                if state != ConnectionState::Connected {
                    warn!("Dropping frame received before open from {}", self.url);
                    return;
                }
                debug!("Received {} bytes from {}", message.len(), self.url);
                self.deliver("on_message", |handler| handler.on_message(message));
            }
            TransportEvent::Error(reason) => {
                if state == ConnectionState::Disconnected {
                    return;
                }
                warn!("Connection error from {}: {}", self.url, reason);
                self.deliver("on_error", |handler| {
                    handler.on_error(&reason);
                    Ok(())
                });
            }
            TransportEvent::Close { code, reason } => self.on_close(epoch, code, reason),
        }
    }

    /// connecting -> connected.
    fn on_open(&mut self, epoch: u64) {
        {
            let mut shared = lock(&self.shared);
            if shared.epoch != epoch || shared.state != ConnectionState::Connecting {
                return;
            }
            shared.state = ConnectionState::Connected;
        }
        self.attempt = 0;
        info!("Connected to {}", self.url);
        self.deliver("on_open", |handler| {
            handler.on_open();
            Ok(())
        });
    }

    /// connecting/connected -> disconnected, then schedule recovery.
    fn on_close(&mut self, epoch: u64, code: u16, reason: String) {
        let link = {
            let mut shared = lock(&self.shared);
            if shared.epoch != epoch || shared.state == ConnectionState::Disconnected {
                return;
            }
            shared.state = ConnectionState::Disconnected;
            shared.link.take()
        };
        drop(link);

        info!("Disconnected from {} with code {} {}", self.url, code, reason);
        self.deliver("on_close", |handler| {
            handler.on_close(code, &reason);
            Ok(())
        });

        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        let mut shared = lock(&self.shared);
        if shared.closed || self.reconnect.is_some() || shared.state != ConnectionState::Disconnected {
            return;
        }

        self.attempt = self.attempt.saturating_add(1);
        if !self.config.allows_attempt(self.attempt) {
            drop(shared);
            warn!(
                "Giving up on {} after {} reconnect attempts",
                self.url,
                self.attempt - 1
            );
            let reason = NetworkError::MaxRetriesExceeded.to_string();
            self.deliver("on_error", |handler| {
                handler.on_error(&reason);
                Ok(())
            });
            return;
        }

        let delay = self.config.reconnect_delay(self.attempt);
        shared.reconnect_pending = true;
        drop(shared);

        info!(
            "Reconnecting to {} in {} ms (attempt {})",
            self.url,
            delay.as_millis(),
            self.attempt
        );
        self.reconnect = Some(Box::pin(time::sleep(delay)));
    }

    /// Runs one handler callback under the delivery gate, unless the
    /// connection was closed in the meantime.
    fn deliver(&self, callback: &str, f: impl FnOnce(&H) -> HandlerResult) {
        let _gate = lock(&self.delivery.gate);
        if lock(&self.shared).closed {
            debug!("Skipping {} for closed connection to {}", callback, self.url);
            return;
        }
        *lock(&self.delivery.owner) = Some(thread::current().id());
        invoke(callback, || f(&self.handler));
        *lock(&self.delivery.owner) = None;
    }

    /// any -> closed.
    fn shutdown(&mut self) {
        self.reconnect = None;
        let link = lock(&self.shared).close();
        if let Some(mut link) = link {
            link.close();
        }
        debug!("Connection driver for {} stopped", self.url);
    }
}

/// Resolves when the pending reconnect timer fires; never without one.
async fn reconnect_due(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}

/// Runs a handler callback, logging failures instead of unwinding through
/// the driver.
fn invoke(callback: &str, f: impl FnOnce() -> HandlerResult) {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Connection handler {} failed: {}", callback, e),
        Err(_) => warn!("Connection handler {} panicked", callback),
    }
}
