// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared helpers used across test modules. Not every test binary uses every
//! helper.

#![allow(dead_code)]

pub mod strategies;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use swarmlink_core::network::{ConnectionHandler, HandlerResult};

/// One handler callback, as observed by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Open,
    Message(String),
    Error(String),
    Close(u16, String),
}

/// Shared, cloneable view of everything a [`RecordingHandler`] saw.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Seen>>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<Seen> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn count(&self, matches: impl Fn(&Seen) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| matches(e)).count()
    }

    pub fn opens(&self) -> usize {
        self.count(|e| matches!(e, Seen::Open))
    }

    pub fn closes(&self) -> usize {
        self.count(|e| matches!(e, Seen::Close(..)))
    }

    fn push(&self, seen: Seen) {
        self.events.lock().unwrap().push(seen);
    }
}

/// Handler that records every callback.
///
/// Messages equal to `reject` make `on_message` return an error and messages
/// equal to `panic_on` make it panic, after being recorded.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    log: EventLog,
    reject: Option<String>,
    panic_on: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> (Self, EventLog) {
        let handler = RecordingHandler::default();
        let log = handler.log.clone();
        (handler, log)
    }

    pub fn rejecting(mut self, message: &str) -> Self {
        self.reject = Some(message.to_string());
        self
    }

    pub fn panicking_on(mut self, message: &str) -> Self {
        self.panic_on = Some(message.to_string());
        self
    }
}

impl ConnectionHandler for RecordingHandler {
    fn on_open(&self) {
        self.log.push(Seen::Open);
    }

    fn on_message(&self, message: String) -> HandlerResult {
        self.log.push(Seen::Message(message.clone()));
        if self.panic_on.as_deref() == Some(message.as_str()) {
            panic!("handler panicked on {}", message);
        }
        if self.reject.as_deref() == Some(message.as_str()) {
            return Err(format!("rejected {}", message).into());
        }
        Ok(())
    }

    fn on_error(&self, reason: &str) {
        self.log.push(Seen::Error(reason.to_string()));
    }

    fn on_close(&self, code: u16, reason: &str) {
        self.log.push(Seen::Close(code, reason.to_string()));
    }
}

/// Lets the connection driver drain everything that is ready.
///
/// Under a paused clock this advances time by one millisecond.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Advances the (paused) clock by `ms` milliseconds.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
