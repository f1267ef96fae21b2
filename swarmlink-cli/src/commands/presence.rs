//! Presence Command
//!
//! Classifies a single last-seen timestamp.

use anyhow::Result;
use serde_json::{json, Value};
use swarmlink_core::{now_millis, ActiveTransfers, Contact, ContactActivity, Millis};

use crate::config::CliConfig;
use crate::display;

const CONTACT_KEY: &str = "contact";

/// Evaluates presence for a contact last seen at `last_seen`.
pub fn evaluate(
    config: &CliConfig,
    last_seen: Millis,
    now: Millis,
    transferring: bool,
) -> (Contact, ContactActivity) {
    let contact = Contact::from_record(CONTACT_KEY, CONTACT_KEY, "", Value::Null, last_seen, last_seen);
    let mut transfers = ActiveTransfers::new();
    if transferring {
        transfers.begin(CONTACT_KEY);
    }
    let activity = config.evaluator().activity(&contact, now, &transfers);
    (contact, activity)
}

/// Prints the classification, as text or JSON.
pub fn run(
    config: &CliConfig,
    last_seen: Millis,
    now: Option<Millis>,
    transferring: bool,
    as_json: bool,
) -> Result<()> {
    let now = now.unwrap_or_else(now_millis);
    let (contact, activity) = evaluate(config, last_seen, now, transferring);

    if as_json {
        let report = json!({
            "contact": contact,
            "now": now,
            "online": activity.is_online(),
            "activity": display::activity_label(activity),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::activity(contact.name(), activity);
        println!(
            "  last seen {} ms ago (window {} ms)",
            now.saturating_sub(last_seen),
            config.online_window_ms
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> CliConfig {
        CliConfig {
            server: "localhost:8546".into(),
            reconnect_delay: Duration::from_secs(5),
            max_reconnects: None,
            online_window_ms: 5_000,
        }
    }

    #[test]
    fn test_evaluate_window_edges() {
        assert_eq!(
            evaluate(&config(), 10_000, 15_000, false).1,
            ContactActivity::Online
        );
        assert_eq!(
            evaluate(&config(), 10_000, 15_001, false).1,
            ContactActivity::Offline
        );
    }

    #[test]
    fn test_evaluate_transferring() {
        assert_eq!(
            evaluate(&config(), 10_000, 11_000, true).1,
            ContactActivity::Transferring
        );
        assert_eq!(
            evaluate(&config(), 10_000, 60_000, true).1,
            ContactActivity::Offline
        );
    }
}
