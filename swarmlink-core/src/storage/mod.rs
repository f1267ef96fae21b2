// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Storage Module
//!
//! Owned, in-memory collection of contacts keyed by public key, plus the
//! in-flight transfer markers read by the presence evaluator. Callers pass
//! the store by reference to whatever needs it; there is no global instance.
//! Encoding the collection for persistence is left to the caller (see the
//! serde impls on [`Contact`]).

mod contacts;
mod error;
mod transfers;

pub use error::StorageError;
pub use transfers::{ActiveTransfers, TransferTracker};

use std::collections::HashMap;

use crate::contact::Contact;

/// In-memory contact store.
///
/// Assumes a single writer at a time; wrap it in a lock to share it across
/// tasks.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: HashMap<String, Contact>,
    transfers: ActiveTransfers,
}

impl ContactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
