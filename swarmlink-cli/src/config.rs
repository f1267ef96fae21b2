//! CLI Configuration

use std::time::Duration;

use swarmlink_core::network::ConnectionConfig;
use swarmlink_core::PresenceEvaluator;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Node address (`host:port` or a full `ws://` URL).
    pub server: String,
    /// Constant delay between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Consecutive reconnect attempts before giving up. `None` retries forever.
    pub max_reconnects: Option<u32>,
    /// A contact seen within this window counts as online.
    pub online_window_ms: u64,
}

impl CliConfig {
    /// Returns the connection config for the node connection.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            max_reconnect_attempts: self.max_reconnects,
            ..ConnectionConfig::with_constant_delay(self.reconnect_delay)
        }
    }

    /// Returns the presence evaluator for the configured window.
    pub fn evaluator(&self) -> PresenceEvaluator {
        PresenceEvaluator::new(self.online_window_ms)
    }
}
