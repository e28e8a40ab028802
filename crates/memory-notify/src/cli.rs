//! CLI argument parsing for memory-notify.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Memory event notifier
///
/// Prints memory lifecycle events as JSON and validates event streams.
#[derive(Parser, Debug)]
#[command(name = "memory-notify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/memory-events/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Notifier commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print a heartbeat event
    Ping,

    /// Print a message service status event
    Status {
        /// Status value (e.g. "ready", "stalled")
        status: String,

        /// Human-readable detail
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Print the id of the most recent memory
    LastMemory {
        /// Memory ID
        memory_id: String,
    },

    /// Validate JSON-lines events from stdin and print them in canonical form
    Check,

    /// List the event types accepted by `check`
    Types,
}
