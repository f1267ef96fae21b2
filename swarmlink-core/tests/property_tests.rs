// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Property-Based Tests
//!
//! Presence classification and store updates over generated contacts.

mod common;

use common::strategies::*;
use proptest::prelude::*;
use swarmlink_core::*;

proptest! {
    #[test]
    fn prop_online_iff_within_window(
        contact in contact_strategy(),
        now in timestamp_strategy(),
    ) {
        let expected = now.saturating_sub(contact.last_seen()) <= DEFAULT_ONLINE_WINDOW_MS;
        prop_assert_eq!(is_online(&contact, now), expected);
    }

    #[test]
    fn prop_window_boundary(last_seen in timestamp_strategy(), window in 0u64..600_000) {
        let contact = Contact::from_record("ab12", "Alice", "", serde_json::Value::Null, last_seen, 0);
        let evaluator = PresenceEvaluator::new(window);
        prop_assert!(evaluator.is_online(&contact, last_seen + window));
        prop_assert!(!evaluator.is_online(&contact, last_seen + window + 1));
    }

    #[test]
    fn prop_evaluation_is_pure(contact in contact_strategy(), now in timestamp_strategy()) {
        let before = contact.clone();
        let transfers = ActiveTransfers::new();
        let first = PresenceEvaluator::default().activity(&contact, now, &transfers);
        let second = PresenceEvaluator::default().activity(&contact, now, &transfers);
        prop_assert_eq!(first, second);
        prop_assert_eq!(contact, before);
    }

    #[test]
    fn prop_later_now_never_brings_contact_online(
        contact in contact_strategy(),
        now in timestamp_strategy(),
        later in 0u64..1_000_000,
    ) {
        if !is_online(&contact, now) {
            prop_assert!(!is_online(&contact, now + later));
        }
    }

    #[test]
    fn prop_updates_preserve_identity(
        contact in contact_strategy(),
        last_seen in timestamp_strategy(),
        name in display_name_strategy(),
        state in state_strategy(),
    ) {
        let mut store = ContactStore::new();
        let key = contact.public_key().to_string();
        let known_since = contact.known_since();
        store.put(contact).unwrap();

        store.update_last_seen(&key, last_seen).unwrap();
        store.update_name(&key, &name).unwrap();
        store.update_state(&key, state.clone()).unwrap();

        let updated = store.get(&key).unwrap();
        prop_assert_eq!(updated.public_key(), key.as_str());
        prop_assert_eq!(updated.known_since(), known_since);
        prop_assert_eq!(updated.last_seen(), last_seen);
        prop_assert_eq!(updated.name(), name.as_str());
        prop_assert_eq!(updated.state(), &state);
        prop_assert_eq!(store.len(), 1);
    }
}
