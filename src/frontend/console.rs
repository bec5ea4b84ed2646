//! Terminal front-end.
//!
//! # Responsibilities
//! - Read menu commands from stdin and forward them to the dispatcher
//! - Route `ok` to the console presenter while an alert is open
//! - Print the status line whenever it changes
//!
//! # Design Decisions
//! - Parsing is separated from I/O so it can be tested directly
//! - The indicator mirrors the tray icon: green when online, red otherwise

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::alarm::ConsolePresenter;
use crate::command::{Command, UnknownCommand};
use crate::lifecycle::ShutdownSignal;
use crate::monitor::StatusSnapshot;

const ONLINE_RGB: (u8, u8, u8) = (87, 255, 87);
const OFFLINE_RGB: (u8, u8, u8) = (255, 87, 87);

pub const HELP: &str = "commands: start | stop | test | status | quit   (ok = acknowledge alert)";

/// One line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(Command),
    Acknowledge,
    Status,
    Help,
    Empty,
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, UnknownCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Ok(ConsoleInput::Empty),
        "ok" | "ack" => Ok(ConsoleInput::Acknowledge),
        "status" => Ok(ConsoleInput::Status),
        "help" | "?" => Ok(ConsoleInput::Help),
        other => other.parse().map(ConsoleInput::Command),
    }
}

/// `● Server Alarm - Monitoring: ON | Server: Offline | Last: 12:00:03`
pub fn render_status(snapshot: &StatusSnapshot) -> String {
    let (r, g, b) = if snapshot.is_online() {
        ONLINE_RGB
    } else {
        OFFLINE_RGB
    };
    format!("\x1b[38;2;{r};{g};{b}m\u{25cf}\x1b[0m Server Alarm - {snapshot}")
}

/// Forward stdin lines from a dedicated thread.
///
/// The thread is detached so a blocked read never holds up process exit.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("console-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
            tracing::debug!("stdin closed");
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to start console input thread");
    }
    rx
}

/// Handle console lines until input ends or shutdown.
pub async fn read_commands(
    mut lines: mpsc::Receiver<String>,
    commands: mpsc::Sender<Command>,
    presenter: Option<Arc<ConsolePresenter>>,
    status: watch::Receiver<StatusSnapshot>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = shutdown.recv() => break,
        };
        let Some(line) = line else {
            break;
        };

        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match input {
            ConsoleInput::Empty => {}
            ConsoleInput::Acknowledge => {
                if !presenter.as_ref().is_some_and(|p| p.acknowledge()) {
                    println!("no alert is open");
                }
            }
            ConsoleInput::Status => println!("{}", render_status(&status.borrow())),
            ConsoleInput::Help => println!("{HELP}"),
            ConsoleInput::Command(command) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Print the status line on every change until shutdown.
pub async fn print_status(mut status: watch::Receiver<StatusSnapshot>, mut shutdown: ShutdownSignal) {
    println!("{}", render_status(&status.borrow_and_update()));
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render_status(&status.borrow_and_update()));
            }
            _ = shutdown.recv() => break,
        }
    }
}
