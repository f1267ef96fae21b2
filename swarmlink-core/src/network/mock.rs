// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Scriptable implementation of the Transport trait for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::NetworkError;
use super::transport::{
    EventSink, Transport, TransportEvent, TransportLink, TransportResult, CLOSE_NORMAL,
};

/// What the mock does when a handle is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Reports `Open` right away.
    Accept,
    /// Reports `Error(reason)` followed by an abnormal `Close`.
    Fail(String),
    /// Reports nothing; the test drives the handle with [`MockTransport::emit`].
    Pending,
    /// Returns the error from `open` itself.
    Refuse(NetworkError),
}

/// One handle opened through the mock.
#[derive(Debug, Clone)]
pub struct MockAttempt {
    /// URL the handle was opened with.
    pub url: String,
    sink: EventSink,
    link: Arc<Mutex<LinkState>>,
}

impl MockAttempt {
    /// Returns every frame sent over this handle.
    pub fn sent(&self) -> Vec<String> {
        lock(&self.link).sent.clone()
    }

    /// Returns true once the handle was closed by its owner.
    pub fn is_closed(&self) -> bool {
        lock(&self.link).closed
    }

    /// Returns the epoch the connection assigned to this handle.
    pub fn epoch(&self) -> u64 {
        self.sink.epoch()
    }
}

#[derive(Debug, Default)]
struct LinkState {
    sent: Vec<String>,
    closed: bool,
}

#[derive(Debug)]
struct MockState {
    script: VecDeque<MockBehavior>,
    fallback: MockBehavior,
    attempts: Vec<MockAttempt>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock transport for testing.
///
/// Clones share state, so a test can keep one clone and hand another to a
/// connection.
///
/// # Example
///
/// ```ignore
/// use swarmlink_core::network::{MockBehavior, MockTransport};
///
/// let transport = MockTransport::with_behavior(MockBehavior::Pending);
/// transport.push_behavior(MockBehavior::Fail("refused".into()));
///
/// // ... open a connection over `transport.clone()`
///
/// transport.emit(0, TransportEvent::Message("hi".into()));
/// assert_eq!(transport.open_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a mock that accepts every handle.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Accept)
    }

    /// Creates a mock that applies `behavior` to every handle.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        MockTransport {
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                fallback: behavior,
                attempts: Vec::new(),
            })),
        }
    }

    /// Queues a behavior for the next unscripted handle.
    pub fn push_behavior(&self, behavior: MockBehavior) {
        lock(&self.state).script.push_back(behavior);
    }

    /// Returns how many handles have been opened.
    pub fn open_count(&self) -> usize {
        lock(&self.state).attempts.len()
    }

    /// Returns the handle opened at `index`.
    pub fn attempt(&self, index: usize) -> Option<MockAttempt> {
        lock(&self.state).attempts.get(index).cloned()
    }

    /// Returns every frame sent across all handles, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        lock(&self.state)
            .attempts
            .iter()
            .flat_map(|attempt| attempt.sent())
            .collect()
    }

    /// Reports `event` on the handle opened at `index`.
    ///
    /// Returns false if there is no such handle or nobody is listening.
    pub fn emit(&self, index: usize, event: TransportEvent) -> bool {
        match self.attempt(index) {
            Some(attempt) => attempt.sink.emit(event),
            None => false,
        }
    }

    /// Reports `event` on the most recently opened handle.
    pub fn emit_latest(&self, event: TransportEvent) -> bool {
        let count = self.open_count();
        count > 0 && self.emit(count - 1, event)
    }
}

impl Transport for MockTransport {
    fn open(&self, url: &str, events: EventSink) -> TransportResult<Box<dyn TransportLink>> {
        let (behavior, link) = {
            let mut state = lock(&self.state);
            let behavior = state
                .script
                .pop_front()
                .unwrap_or_else(|| state.fallback.clone());
            let link = Arc::new(Mutex::new(LinkState::default()));
            state.attempts.push(MockAttempt {
                url: url.to_string(),
                sink: events.clone(),
                link: link.clone(),
            });
            (behavior, link)
        };

        match behavior {
            MockBehavior::Accept => {
                events.emit(TransportEvent::Open);
            }
            MockBehavior::Fail(reason) => events.fail(reason),
            MockBehavior::Pending => {}
            MockBehavior::Refuse(err) => return Err(err),
        }

        Ok(Box::new(MockLink { events, link }))
    }
}

struct MockLink {
    events: EventSink,
    link: Arc<Mutex<LinkState>>,
}

impl TransportLink for MockLink {
    fn send(&mut self, data: &str) -> TransportResult<()> {
        let mut link = lock(&self.link);
        if link.closed {
            return Err(NetworkError::ConnectionClosed);
        }
        link.sent.push(data.to_string());
        Ok(())
    }

    fn close(&mut self) {
        let mut link = lock(&self.link);
        if link.closed {
            return;
        }
        link.closed = true;
        drop(link);
        self.events.emit(TransportEvent::Close {
            code: CLOSE_NORMAL,
            reason: "closed by owner".into(),
        });
    }
}
