//! Terminal output helpers.

use console::style;
use swarmlink_core::ContactActivity;

/// Prints an informational line.
pub fn info(message: &str) {
    println!("{} {}", style("i").cyan(), message);
}

/// Prints a success line.
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Prints a warning line.
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow(), message);
}

/// Prints an inbound frame.
pub fn inbound(frame: &str) {
    println!("{} {}", style("<").dim(), frame);
}

/// Returns a short label for a contact's activity.
pub fn activity_label(activity: ContactActivity) -> &'static str {
    match activity {
        ContactActivity::Offline => "offline",
        ContactActivity::Online => "online",
        ContactActivity::Transferring => "transferring",
    }
}

/// Prints a contact's activity.
pub fn activity(name: &str, activity: ContactActivity) {
    let label = activity_label(activity);
    let label = match activity {
        ContactActivity::Offline => style(label).red(),
        ContactActivity::Online => style(label).green(),
        ContactActivity::Transferring => style(label).yellow(),
    };
    println!("{} is {}", style(name).bold(), label);
}
