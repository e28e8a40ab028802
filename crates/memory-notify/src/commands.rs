//! Command implementations for memory-notify.
//!
//! Events are written to stdout, one JSON object per line.
//! Logs go to stderr so the event stream stays machine-readable.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use memory_events::{
    EventSettings, LastMemoryEvent, MessageEvent, MessageServiceStatusEvent, PingEvent,
    TypeRegistry, RESERVED_TYPES,
};

use crate::cli::{Cli, Commands};

/// Outcome of validating an event stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    /// Lines that decoded into a valid event
    pub accepted: usize,
    /// Lines that failed to decode
    pub rejected: usize,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let mut settings =
        EventSettings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    init_logging(&settings.log_level)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Ping => emit(&mut out, &PingEvent::new().into())?,
        Commands::Status { status, text } => {
            let mut event = MessageServiceStatusEvent::new(status);
            if let Some(text) = text {
                event = event.with_status_text(text);
            }
            emit(&mut out, &event.into())?;
        }
        Commands::LastMemory { memory_id } => {
            emit(&mut out, &LastMemoryEvent::new(memory_id).into())?;
        }
        Commands::Check => {
            let registry = settings.registry().context("Invalid type aliases")?;
            let stdin = io::stdin();
            let report = check_events(stdin.lock(), &mut out, &registry)?;

            info!(
                accepted = report.accepted,
                rejected = report.rejected,
                "Event check finished"
            );
            if report.rejected > 0 {
                bail!(
                    "{} of {} events failed validation",
                    report.rejected,
                    report.total()
                );
            }
        }
        Commands::Types => {
            let registry = settings.registry().context("Invalid type aliases")?;
            list_types(&mut out, &registry)?;
        }
    }

    Ok(())
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Write one event as a JSON line.
pub fn emit<W: Write>(out: &mut W, event: &MessageEvent) -> Result<()> {
    let bytes = event
        .to_bytes()
        .with_context(|| format!("Failed to encode `{}` event", event.event_type()))?;
    out.write_all(&bytes)?;
    out.write_all(b"\n")?;
    debug!(event_type = event.event_type(), "Emitted event");
    Ok(())
}

/// Decode each non-blank input line and re-emit valid events canonically.
///
/// Invalid lines are logged with their 1-based line number and counted.
pub fn check_events<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    registry: &TypeRegistry,
) -> Result<CheckReport> {
    let mut report = CheckReport::default();

    // Raw bytes, so a line that is not UTF-8 is rejected on its own
    for (index, line) in input.split(b'\n').enumerate() {
        let mut line = line.context("Failed to read input")?;
        let line_number = index + 1;

        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match memory_events::decode_bytes(&line, registry) {
            Ok(event) => {
                emit(out, &event)?;
                report.accepted += 1;
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "Rejected event");
                report.rejected += 1;
            }
        }
    }

    Ok(report)
}

/// Print every accepted discriminator and the payload it decodes to.
pub fn list_types<W: Write>(out: &mut W, registry: &TypeRegistry) -> Result<()> {
    for fixed in RESERVED_TYPES {
        writeln!(out, "{fixed}\tfixed")?;
    }
    for (event_type, shape) in registry.entries() {
        writeln!(out, "{event_type}\t{shape}")?;
    }
    Ok(())
}
