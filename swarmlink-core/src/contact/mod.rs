// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Module
//!
//! Represents contacts known to this device, keyed by public key, together
//! with the presence model derived from their last-seen timestamps.

pub mod presence;

pub use presence::{
    has_active_transfer, is_online, now_millis, ContactActivity, PresenceEvaluator,
    DEFAULT_ONLINE_WINDOW_MS,
};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

/// Application-defined status of a contact. Opaque to this crate.
pub type ContactState = serde_json::Value;

/// What kind of party a contact is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    Person,
}

/// A contact known to this device.
///
/// The public key never changes after creation and neither does
/// `known_since`. Everything else is updated in place through
/// [`ContactStore`](crate::storage::ContactStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "type", default)]
    kind: ContactKind,
    /// Their public key (unique identifier)
    public_key: String,
    /// Their display name
    name: String,
    /// Transport address used when sending to them directly
    #[serde(default)]
    address: String,
    /// Application-defined status
    #[serde(default)]
    state: ContactState,
    /// Most recent known contact time
    last_seen: Millis,
    /// When the contact was created
    known_since: Millis,
}

impl Contact {
    /// Creates a new contact first seen at `now`.
    pub fn new(
        public_key: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        state: ContactState,
        now: Millis,
    ) -> Self {
        Contact {
            kind: ContactKind::Person,
            public_key: public_key.into(),
            name: name.into(),
            address: address.into(),
            state,
            last_seen: now,
            known_since: now,
        }
    }

    /// Restores a contact from a persisted record.
    pub fn from_record(
        public_key: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        state: ContactState,
        last_seen: Millis,
        known_since: Millis,
    ) -> Self {
        Contact {
            kind: ContactKind::Person,
            public_key: public_key.into(),
            name: name.into(),
            address: address.into(),
            state,
            last_seen,
            known_since,
        }
    }

    /// Returns the contact kind.
    pub fn kind(&self) -> ContactKind {
        self.kind
    }

    /// Returns the contact's public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the contact's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transport address for direct sends.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the application-defined status.
    pub fn state(&self) -> &ContactState {
        &self.state
    }

    /// Returns the most recent known contact time.
    pub fn last_seen(&self) -> Millis {
        self.last_seen
    }

    /// Returns when the contact was created.
    pub fn known_since(&self) -> Millis {
        self.known_since
    }

    pub(crate) fn set_last_seen(&mut self, last_seen: Millis) {
        self.last_seen = last_seen;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_state(&mut self, state: ContactState) {
        self.state = state;
    }
}
