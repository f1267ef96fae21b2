//! Connect Command
//!
//! Keeps a connection to a node open, forwarding stdin lines to it and
//! reporting the node's presence once per second.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use swarmlink_core::network::{CallbackHandler, Connection, NetworkError, WebSocketTransport};
use swarmlink_core::{now_millis, ContactActivity, ContactStore, Millis, PresenceEvaluator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::display;

/// Interval between presence evaluations.
const TICK: Duration = Duration::from_secs(1);

fn lock(store: &Mutex<ContactStore>) -> MutexGuard<'_, ContactStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reports a contact's activity only when it changes.
struct PresenceWatch {
    key: String,
    last: Option<ContactActivity>,
}

impl PresenceWatch {
    fn new(key: impl Into<String>) -> Self {
        PresenceWatch {
            key: key.into(),
            last: None,
        }
    }

    /// Returns the new activity if it differs from the last observation.
    fn observe(
        &mut self,
        store: &ContactStore,
        now: Millis,
        evaluator: &PresenceEvaluator,
    ) -> Option<ContactActivity> {
        let current = store.activity(&self.key, now, evaluator)?;
        if self.last == Some(current) {
            return None;
        }
        self.last = Some(current);
        Some(current)
    }
}

/// Connects to the configured node until stdin closes or Ctrl-C.
pub async fn run(config: &CliConfig, name: &str, key: Option<&str>) -> Result<()> {
    let key = key.unwrap_or(config.server.as_str()).to_string();
    let store = Arc::new(Mutex::new(ContactStore::new()));
    lock(&store)
        .create_contact(&key, name, &config.server, Value::Null, now_millis())
        .context("Invalid node key")?;

    let handler = {
        let store = store.clone();
        let key = key.clone();
        CallbackHandler::new()
            .on_open(|| display::success("Connected"))
            .on_message(move |frame| {
                lock(&store).update_last_seen(&key, now_millis())?;
                display::inbound(&frame);
                Ok(())
            })
            .on_error(|reason| display::warning(&format!("Connection error: {}", reason)))
            .on_close(|code, reason| {
                display::warning(&format!("Connection closed ({}) {}", code, reason))
            })
    };

    let connection = Connection::open_with(
        WebSocketTransport::new(),
        &config.server,
        handler,
        config.connection(),
    )
    .with_context(|| format!("Failed to open connection to {}", config.server))?;
    info!("Connecting to {}", connection.server_url());

    let evaluator = config.evaluator();
    let mut watch = PresenceWatch::new(key);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => send_line(&connection, line.trim())?,
                None => break,
            },
            _ = ticker.tick() => {
                let change = watch.observe(&lock(&store), now_millis(), &evaluator);
                if let Some(activity) = change {
                    display::activity(name, activity);
                }
            }
            _ = &mut shutdown => break,
        }
    }

    connection.close();
    display::info("Disconnected");
    Ok(())
}

fn send_line(connection: &Connection, line: &str) -> Result<()> {
    if line.is_empty() {
        return Ok(());
    }
    match connection.send(line) {
        Ok(()) => {
            debug!("Sent {} bytes", line.len());
            Ok(())
        }
        Err(NetworkError::NotConnected) => {
            display::warning("Not connected; line dropped");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
