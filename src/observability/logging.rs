//! Structured logging.
//!
//! # Responsibilities
//! - Console output filtered by `RUST_LOG`, falling back to `Logging.level`
//! - Append-only log file with one `timestamp - message` line per event
//!
//! # Design Decisions
//! - An unwritable log file is reported and skipped, never fatal
//! - Initialization happens once, before the monitor starts

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

/// `2026-10-17 12:00:03,512 - message key=value`
#[derive(Debug, Clone, Copy, Default)]
pub struct DashFormat;

impl<S, N> FormatEvent<S, N> for DashFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} - ", Local::now().format("%Y-%m-%d %H:%M:%S,%3f"))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("server_alarm={}", config.level)));
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(console_filter);

    let file_error;
    let file_layer = match OpenOptions::new().create(true).append(true).open(&config.file) {
        Ok(file) => {
            file_error = None;
            let filter = EnvFilter::new(format!("server_alarm={}", config.level));
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .event_format(DashFormat)
                    .with_writer(Mutex::new(file))
                    .with_filter(filter),
            )
        }
        Err(e) => {
            file_error = Some(e);
            None
        }
    };

    let installed = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some(e) = file_error {
        tracing::warn!(path = %config.file.display(), error = %e, "Log file unavailable, logging to console only");
    }
    installed
}
