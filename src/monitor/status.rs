//! Monitor status model.
//!
//! # States
//! - ServerStatus: Unknown until the first probe, then Online/Offline
//! - MonitoringState: Idle (no poll worker) or Running (exactly one)
//!
//! # Design Decisions
//! - Server status and last-ping time travel together in one snapshot, so a
//!   reader never pairs a fresh timestamp with a stale status

use std::fmt;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ServerStatus::Unknown => "Unknown",
            ServerStatus::Online => "Online",
            ServerStatus::Offline => "Offline",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitoringState {
    #[default]
    Idle,
    Running,
}

impl fmt::Display for MonitoringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MonitoringState::Idle => "OFF",
            MonitoringState::Running => "ON",
        })
    }
}

/// Point-in-time view of the monitor, as seen by the status sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub server: ServerStatus,
    /// Start time of the most recent published probe.
    pub last_ping: Option<DateTime<Local>>,
    pub monitoring: MonitoringState,
}

impl StatusSnapshot {
    /// `HH:MM:SS`, or `Never` before the first probe.
    pub fn last_ping_text(&self) -> String {
        self.last_ping
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "Never".to_string())
    }

    pub fn is_online(&self) -> bool {
        self.server == ServerStatus::Online
    }

    pub(crate) fn record_probe(&mut self, server: ServerStatus, started: DateTime<Local>) {
        self.server = server;
        self.last_ping = Some(match self.last_ping {
            Some(previous) if previous > started => previous,
            _ => started,
        });
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Monitoring: {} | Server: {} | Last: {}",
            self.monitoring,
            self.server,
            self.last_ping_text()
        )
    }
}
