// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use proptest::prelude::*;
use serde_json::Value;
use swarmlink_core::{Contact, Millis};

/// Strategy for generating hex-encoded public keys.
pub fn public_key_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{64}"
}

/// Strategy for generating display names (non-empty, reasonable length).
pub fn display_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,49}"
        .prop_map(|s| s.trim().to_string())
        .prop_filter("non-empty", |s| !s.is_empty())
}

/// Strategy for generating node addresses (`host:port`).
pub fn address_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", 1u16..=65535).prop_map(|(host, port)| format!("{}:{}", host, port))
}

/// Strategy for generating timestamps in a plausible range.
pub fn timestamp_strategy() -> impl Strategy<Value = Millis> {
    1_000_000_000_000u64..2_000_000_000_000u64
}

/// Strategy for generating application-defined contact states.
pub fn state_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        "[a-z]{1,12}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Strategy for generating contacts.
pub fn contact_strategy() -> impl Strategy<Value = Contact> {
    (
        public_key_strategy(),
        display_name_strategy(),
        address_strategy(),
        state_strategy(),
        timestamp_strategy(),
        timestamp_strategy(),
    )
        .prop_map(|(key, name, address, state, last_seen, known_since)| {
            Contact::from_record(key, name, address, state, last_seen, known_since)
        })
}
