//! User commands.
//!
//! # Data Flow
//! ```text
//! console / signals
//!     → mpsc::Sender<Command>
//!     → dispatch.rs (one loop, one controller)
//!     → MonitorController::{start, stop, test_alarm, shutdown}
//! ```

pub mod dispatch;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use dispatch::CommandDispatcher;

/// The closed set of user commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    TestAlarm,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?} (expected start, stop, test or quit)")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "test" | "test-alarm" | "testalarm" => Ok(Command::TestAlarm),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Start => "Start Monitoring",
            Command::Stop => "Stop Monitoring",
            Command::TestAlarm => "Test Alarm",
            Command::Quit => "Quit",
        })
    }
}
