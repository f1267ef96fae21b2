//! SwarmLink Core Library
//!
//! Resilient node connection and contact presence for peer-to-peer file sharing.
//!
//! - [`network`]: one logical connection to a discovery/message node, kept
//!   alive across transport failures
//! - [`contact`]: contact records and the presence/activity evaluator
//! - [`storage`]: owned contact store with in-flight transfer markers

pub mod contact;
pub mod network;
pub mod storage;

pub use contact::{
    has_active_transfer, is_online, now_millis, Contact, ContactActivity, ContactKind,
    ContactState, Millis, PresenceEvaluator, DEFAULT_ONLINE_WINDOW_MS,
};
pub use network::{
    Backoff, CallbackHandler, Connection, ConnectionConfig, ConnectionHandler, ConnectionState,
    HandlerResult, MockTransport, NetworkError, NoopHandler, Transport, TransportEvent,
};
#[cfg(feature = "network")]
pub use network::WebSocketTransport;
pub use storage::{ActiveTransfers, ContactStore, StorageError, TransferTracker};
