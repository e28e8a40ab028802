//! Memory event notifier library.
//!
//! Exposes the CLI definition and command handlers so they can be tested
//! without spawning the binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{check_events, emit, list_types, run, CheckReport};
