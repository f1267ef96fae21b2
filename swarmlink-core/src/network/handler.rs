// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Handler
//!
//! Callbacks a caller supplies when opening a logical connection.

use std::error::Error;

/// Result of handling one inbound message.
///
/// An `Err` is logged by the connection and does not affect delivery of
/// later messages.
pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Connection event handler trait.
///
/// Every callback is optional. Callbacks for one connection are invoked from
/// a single task, one at a time, and never while the connection holds its
/// internal lock, so they may call [`Connection::send`] or
/// [`Connection::close`].
///
/// [`Connection::send`]: super::Connection::send
/// [`Connection::close`]: super::Connection::close
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Called once per successful establishment.
    fn on_open(&self) {}

    /// Called for every inbound frame.
    fn on_message(&self, _message: String) -> HandlerResult {
        Ok(())
    }

    /// Called when the transport reports an error.
    fn on_error(&self, _reason: &str) {}

    /// Called once when a transport handle closes.
    fn on_close(&self, _code: u16, _reason: &str) {}
}

/// A handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl ConnectionHandler for NoopHandler {}

type OpenFn = Box<dyn Fn() + Send + Sync>;
type MessageFn = Box<dyn Fn(String) -> HandlerResult + Send + Sync>;
type ErrorFn = Box<dyn Fn(&str) + Send + Sync>;
type CloseFn = Box<dyn Fn(u16, &str) + Send + Sync>;

/// Closure-based connection handler.
///
/// # Example
///
/// ```ignore
/// let handler = CallbackHandler::new()
///     .on_open(|| println!("connected"))
///     .on_message(|message| {
///         println!("received {message}");
///         Ok(())
///     });
/// ```
#[derive(Default)]
pub struct CallbackHandler {
    open: Option<OpenFn>,
    message: Option<MessageFn>,
    error: Option<ErrorFn>,
    close: Option<CloseFn>,
}

impl CallbackHandler {
    /// Creates a handler with no callbacks set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the open callback.
    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.open = Some(Box::new(f));
        self
    }

    /// Sets the message callback.
    pub fn on_message(mut self, f: impl Fn(String) -> HandlerResult + Send + Sync + 'static) -> Self {
        self.message = Some(Box::new(f));
        self
    }

    /// Sets the error callback.
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Sets the close callback.
    pub fn on_close(mut self, f: impl Fn(u16, &str) + Send + Sync + 'static) -> Self {
        self.close = Some(Box::new(f));
        self
    }
}

impl ConnectionHandler for CallbackHandler {
    fn on_open(&self) {
        if let Some(f) = &self.open {
            f();
        }
    }

    fn on_message(&self, message: String) -> HandlerResult {
        match &self.message {
            Some(f) => f(message),
            None => Ok(()),
        }
    }

    fn on_error(&self, reason: &str) {
        if let Some(f) = &self.error {
            f(reason);
        }
    }

    fn on_close(&self, code: u16, reason: &str) {
        if let Some(f) = &self.close {
            f(code, reason);
        }
    }
}
