//! Presence Workflow Integration Tests
//!
//! Inbound frames refresh a contact's last-seen time through the handler;
//! presence is then evaluated against the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use swarmlink_core::network::{
    CallbackHandler, Connection, ConnectionConfig, MockTransport, TransportEvent,
};
use swarmlink_core::{ContactActivity, ContactStore, PresenceEvaluator};

const NODE_KEY: &str = "ab12cd34";

struct Harness {
    store: Arc<Mutex<ContactStore>>,
    clock: Arc<AtomicU64>,
    transport: MockTransport,
    connection: Connection,
}

fn harness() -> Harness {
    let store = Arc::new(Mutex::new(ContactStore::new()));
    let clock = Arc::new(AtomicU64::new(1_000));
    store
        .lock()
        .unwrap()
        .create_contact(NODE_KEY, "Node", "localhost:8546", json!(null), 1_000)
        .unwrap();

    let handler = {
        let store = store.clone();
        let clock = clock.clone();
        CallbackHandler::new().on_message(move |_frame| {
            let now = clock.load(Ordering::SeqCst);
            store.lock().unwrap().update_last_seen(NODE_KEY, now)?;
            Ok(())
        })
    };

    let transport = MockTransport::new();
    let connection = Connection::open_with(
        transport.clone(),
        "localhost:8546",
        handler,
        ConnectionConfig::default(),
    )
    .unwrap();

    Harness {
        store,
        clock,
        transport,
        connection,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Test: inbound frames keep a contact online
#[tokio::test(start_paused = true)]
async fn test_inbound_frames_refresh_presence() {
    let h = harness();
    let evaluator = PresenceEvaluator::default();
    settle().await;

    // Silent for longer than the window
    assert!(!evaluator.is_online(h.store.lock().unwrap().get(NODE_KEY).unwrap(), 7_000));

    h.clock.store(7_000, Ordering::SeqCst);
    h.transport
        .emit_latest(TransportEvent::Message("ping".into()));
    settle().await;

    let store = h.store.lock().unwrap();
    let node = store.get(NODE_KEY).unwrap();
    assert_eq!(node.last_seen(), 7_000);
    assert_eq!(node.known_since(), 1_000);
    assert!(evaluator.is_online(node, 12_000));
    assert!(!evaluator.is_online(node, 12_001));
    drop(store);

    h.connection.close();
}

/// Test: a transfer shows only while the contact is online
#[tokio::test(start_paused = true)]
async fn test_transfer_activity_follows_presence() {
    let h = harness();
    let evaluator = PresenceEvaluator::default();
    settle().await;

    h.connection.send("file-offer").unwrap();
    h.store.lock().unwrap().begin_transfer(NODE_KEY).unwrap();

    {
        let store = h.store.lock().unwrap();
        assert_eq!(
            store.activity(NODE_KEY, 2_000, &evaluator),
            Some(ContactActivity::Transferring)
        );
        assert_eq!(
            store.activity(NODE_KEY, 60_000, &evaluator),
            Some(ContactActivity::Offline)
        );
    }

    h.store.lock().unwrap().finish_transfer(NODE_KEY);
    assert_eq!(
        h.store
            .lock()
            .unwrap()
            .activity(NODE_KEY, 2_000, &evaluator),
        Some(ContactActivity::Online)
    );
    assert_eq!(h.transport.sent_messages(), vec!["file-offer".to_string()]);

    h.connection.close();
}

/// Test: presence keeps being refreshed across a reconnect
#[tokio::test(start_paused = true)]
async fn test_presence_survives_reconnect() {
    let h = harness();
    settle().await;

    h.transport.emit_latest(TransportEvent::Close {
        code: 1006,
        reason: "dropped".into(),
    });
    tokio::time::sleep(Duration::from_millis(5_001)).await;
    assert_eq!(h.transport.open_count(), 2);
    assert!(h.connection.is_connected());

    h.clock.store(20_000, Ordering::SeqCst);
    h.transport
        .emit_latest(TransportEvent::Message("hello again".into()));
    settle().await;

    let store = h.store.lock().unwrap();
    assert_eq!(store.get(NODE_KEY).unwrap().last_seen(), 20_000);
    assert_eq!(store.online(21_000, &PresenceEvaluator::default()).len(), 1);
    drop(store);

    h.connection.close();
}
