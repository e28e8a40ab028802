//! Memory event notifier
//!
//! Prints memory lifecycle events as JSON lines and validates event streams.
//!
//! # Usage
//!
//! ```bash
//! memory-notify ping
//! memory-notify status ready --text "Connected"
//! memory-notify last-memory <MEMORY_ID>
//! cat events.jsonl | memory-notify check
//! memory-notify types
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/memory-events/config.toml)
//! 3. CLI-specified config file (--config)
//! 4. Environment variables (MEMORY_EVENTS_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use memory_notify::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
