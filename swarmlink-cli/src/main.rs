//! SwarmLink CLI
//!
//! Command-line client for SwarmLink nodes: keeps a resilient connection to
//! a discovery/message node and reports contact presence.

mod commands;
mod config;
mod display;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use swarmlink_core::network::DEFAULT_RECONNECT_DELAY_MS;
use swarmlink_core::DEFAULT_ONLINE_WINDOW_MS;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "swarmlink")]
#[command(version, about = "Resilient node connection and contact presence")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Node address (host:port, or a ws:// / wss:// URL)
    #[arg(
        long,
        global = true,
        env = "SWARMLINK_SERVER",
        default_value = "localhost:8546"
    )]
    server: String,

    /// Delay between reconnect attempts in milliseconds
    #[arg(
        long,
        global = true,
        env = "SWARMLINK_RECONNECT_DELAY_MS",
        default_value_t = DEFAULT_RECONNECT_DELAY_MS
    )]
    reconnect_delay_ms: u64,

    /// Give up after this many consecutive reconnect attempts
    #[arg(long, global = true, env = "SWARMLINK_MAX_RECONNECTS")]
    max_reconnects: Option<u32>,

    /// A contact seen within this many milliseconds is online
    #[arg(
        long,
        global = true,
        env = "SWARMLINK_ONLINE_WINDOW_MS",
        default_value_t = DEFAULT_ONLINE_WINDOW_MS
    )]
    online_window_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the node and forward stdin lines to it
    Connect {
        /// Display name for the node contact
        #[arg(long, default_value = "node")]
        name: String,

        /// Public key of the node (default: the server address)
        #[arg(long)]
        key: Option<String>,
    },

    /// Classify a last-seen timestamp
    Presence {
        /// Last-seen time in milliseconds since the Unix epoch
        last_seen: u64,

        /// Evaluation time (default: now)
        #[arg(long)]
        now: Option<u64>,

        /// Mark a transfer to the contact as in flight
        #[arg(long)]
        transferring: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("swarmlink=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = CliConfig {
        server: cli.server,
        reconnect_delay: Duration::from_millis(cli.reconnect_delay_ms),
        max_reconnects: cli.max_reconnects,
        online_window_ms: cli.online_window_ms,
    };

    match cli.command {
        Commands::Connect { name, key } => {
            commands::connect::run(&config, &name, key.as_deref()).await?;
        }
        Commands::Presence {
            last_seen,
            now,
            transferring,
            json,
        } => {
            commands::presence::run(&config, last_seen, now, transferring, json)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "swarmlink", &mut io::stdout());
        }
    }

    Ok(())
}
