// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Presence and activity classification.
//!
//! Pure functions of a contact, a caller-supplied `now` and the external
//! transfer markers. Nothing here reads the clock or mutates a contact.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{Contact, Millis};
use crate::storage::TransferTracker;

/// A contact seen within this many milliseconds counts as online.
pub const DEFAULT_ONLINE_WINDOW_MS: Millis = 5_000;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Callers pass this into the evaluator; the evaluator never calls it.
pub fn now_millis() -> Millis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| Millis::try_from(elapsed.as_millis()).unwrap_or(Millis::MAX))
        .unwrap_or(0)
}

/// Returns true if `contact` was seen within the default online window.
pub fn is_online(contact: &Contact, now: Millis) -> bool {
    PresenceEvaluator::default().is_online(contact, now)
}

/// Returns true if an outbound transfer to `contact` is in flight.
pub fn has_active_transfer<T: TransferTracker + ?Sized>(contact: &Contact, transfers: &T) -> bool {
    transfers.is_transferring(contact.public_key())
}

/// Combined presence and activity of a contact, as shown next to it in a
/// contact list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactActivity {
    /// Not seen within the online window.
    Offline,
    /// Online and idle; a send can be started.
    Online,
    /// Online with a transfer in flight.
    Transferring,
}

impl ContactActivity {
    /// Returns true unless the contact is offline.
    pub fn is_online(self) -> bool {
        !matches!(self, ContactActivity::Offline)
    }
}

/// Presence evaluator with a configurable online window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceEvaluator {
    online_window_ms: Millis,
}

impl Default for PresenceEvaluator {
    fn default() -> Self {
        PresenceEvaluator {
            online_window_ms: DEFAULT_ONLINE_WINDOW_MS,
        }
    }
}

impl PresenceEvaluator {
    /// Creates an evaluator with the given online window.
    pub fn new(online_window_ms: Millis) -> Self {
        PresenceEvaluator { online_window_ms }
    }

    /// Returns the online window in milliseconds.
    pub fn online_window_ms(&self) -> Millis {
        self.online_window_ms
    }

    /// Returns true iff `now - last_seen <= window`.
    ///
    /// A `last_seen` later than `now` (clock skew between devices) counts as
    /// online.
    pub fn is_online(&self, contact: &Contact, now: Millis) -> bool {
        now.saturating_sub(contact.last_seen()) <= self.online_window_ms
    }

    /// Classifies `contact` for display.
    ///
    /// Transfers only show while the contact is online.
    pub fn activity<T: TransferTracker + ?Sized>(
        &self,
        contact: &Contact,
        now: Millis,
        transfers: &T,
    ) -> ContactActivity {
        if !self.is_online(contact, now) {
            ContactActivity::Offline
        } else if has_active_transfer(contact, transfers) {
            ContactActivity::Transferring
        } else {
            ContactActivity::Online
        }
    }
}
