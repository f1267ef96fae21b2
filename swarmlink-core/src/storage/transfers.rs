// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-flight transfer markers.

use std::collections::HashSet;

/// Read access to in-flight transfer markers keyed by public key.
pub trait TransferTracker {
    /// Returns true if a transfer to `public_key` is in flight.
    fn is_transferring(&self, public_key: &str) -> bool;
}

/// Set of public keys with an outbound transfer in flight.
///
/// The owner marks a key when a send begins and clears it on completion or
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveTransfers {
    keys: HashSet<String>,
}

impl ActiveTransfers {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a transfer to `public_key` as started.
    ///
    /// Returns false if one was already in flight.
    pub fn begin(&mut self, public_key: impl Into<String>) -> bool {
        self.keys.insert(public_key.into())
    }

    /// Clears the marker for `public_key`.
    ///
    /// Returns false if no transfer was in flight.
    pub fn finish(&mut self, public_key: &str) -> bool {
        self.keys.remove(public_key)
    }

    /// Returns the number of transfers in flight.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl TransferTracker for ActiveTransfers {
    fn is_transferring(&self, public_key: &str) -> bool {
        self.keys.contains(public_key)
    }
}
