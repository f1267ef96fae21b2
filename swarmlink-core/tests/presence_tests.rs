// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for contact::presence

use serde_json::json;
use swarmlink_core::*;

const NOW: Millis = 1_700_000_000_000;

fn contact_seen_at(last_seen: Millis) -> Contact {
    Contact::from_record("ab12", "Alice", "alice:8546", json!("ready"), last_seen, 1_000)
}

#[test]
fn test_seen_exactly_at_window_edge_is_online() {
    assert!(is_online(&contact_seen_at(NOW - 5_000), NOW));
}

#[test]
fn test_seen_one_millisecond_past_window_is_offline() {
    assert!(!is_online(&contact_seen_at(NOW - 5_001), NOW));
}

#[test]
fn test_seen_just_now_is_online() {
    assert!(is_online(&contact_seen_at(NOW), NOW));
}

#[test]
fn test_last_seen_ahead_of_local_clock_is_online() {
    assert!(is_online(&contact_seen_at(NOW + 60_000), NOW));
}

#[test]
fn test_zero_last_seen_is_offline() {
    assert!(!is_online(&contact_seen_at(0), NOW));
}

#[test]
fn test_evaluation_does_not_mutate_contact() {
    let contact = contact_seen_at(NOW - 1_000);
    let before = contact.clone();
    let transfers = ActiveTransfers::new();

    is_online(&contact, NOW);
    has_active_transfer(&contact, &transfers);
    PresenceEvaluator::default().activity(&contact, NOW, &transfers);

    assert_eq!(contact, before);
}

#[test]
fn test_has_active_transfer_follows_marker() {
    let contact = contact_seen_at(NOW);
    let mut transfers = ActiveTransfers::new();
    assert!(!has_active_transfer(&contact, &transfers));

    transfers.begin(contact.public_key());
    assert!(has_active_transfer(&contact, &transfers));

    transfers.finish(contact.public_key());
    assert!(!has_active_transfer(&contact, &transfers));
}

#[test]
fn test_marker_for_other_key_does_not_count() {
    let contact = contact_seen_at(NOW);
    let mut transfers = ActiveTransfers::new();
    transfers.begin("cd34");
    assert!(!has_active_transfer(&contact, &transfers));
}

#[test]
fn test_activity_classification() {
    let evaluator = PresenceEvaluator::default();
    let online = contact_seen_at(NOW - 100);
    let offline = contact_seen_at(NOW - 60_000);
    let mut transfers = ActiveTransfers::new();

    assert_eq!(
        evaluator.activity(&online, NOW, &transfers),
        ContactActivity::Online
    );
    assert_eq!(
        evaluator.activity(&offline, NOW, &transfers),
        ContactActivity::Offline
    );

    transfers.begin("ab12");
    assert_eq!(
        evaluator.activity(&online, NOW, &transfers),
        ContactActivity::Transferring
    );
    assert!(ContactActivity::Transferring.is_online());
    assert!(!ContactActivity::Offline.is_online());
}

#[test]
fn test_evaluator_window_is_configurable() {
    let evaluator = PresenceEvaluator::new(30_000);
    assert_eq!(evaluator.online_window_ms(), 30_000);
    assert!(evaluator.is_online(&contact_seen_at(NOW - 30_000), NOW));
    assert!(!evaluator.is_online(&contact_seen_at(NOW - 30_001), NOW));
    assert_eq!(
        PresenceEvaluator::default().online_window_ms(),
        DEFAULT_ONLINE_WINDOW_MS
    );
}
