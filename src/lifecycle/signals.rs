//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl-C / SIGINT into a `Quit` command
//! - Force exit on a second interrupt
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The first interrupt goes through the normal command path so the poll
//!   worker and any sound loop shut down in order

use tokio::signal;
use tokio::sync::mpsc;

use crate::command::Command;

/// Exit status used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

pub async fn forward_interrupts(commands: mpsc::Sender<Command>) {
    if signal::ctrl_c().await.is_err() {
        tracing::warn!("Unable to listen for interrupt signals");
        return;
    }
    tracing::info!("Interrupt received, quitting");
    let _ = commands.send(Command::Quit).await;

    if signal::ctrl_c().await.is_ok() {
        tracing::warn!("Second interrupt received, forcing exit");
        std::process::exit(FORCED_EXIT_CODE);
    }
}
