//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the presenter and audio backend for the run mode
//! - Build the alert session and the monitor controller
//!
//! # Design Decisions
//! - Headless runs never touch the terminal or an audio device
//! - Interactive runs hand the console presenter back so the front-end can
//!   route acknowledgments to it

use std::sync::Arc;

use crate::alarm::{
    AlertPresenter, AlertSession, AudioBackend, CommandBackend, ConsolePresenter,
    HeadlessPresenter, SilentBackend,
};
use crate::config::AlarmConfig;
use crate::monitor::MonitorController;

/// Run mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Headless,
}

/// Wired-up subsystems.
pub struct Assembly {
    pub controller: Arc<MonitorController>,
    /// Present only in interactive mode.
    pub console: Option<Arc<ConsolePresenter>>,
}

pub fn assemble(config: AlarmConfig, mode: Mode) -> Assembly {
    let (presenter, audio, console): (Arc<dyn AlertPresenter>, Arc<dyn AudioBackend>, _) =
        match mode {
            Mode::Interactive => {
                let console = Arc::new(ConsolePresenter::new());
                (
                    Arc::clone(&console) as Arc<dyn AlertPresenter>,
                    Arc::new(CommandBackend::new(config.sound.player.clone())),
                    Some(console),
                )
            }
            Mode::Headless => (Arc::new(HeadlessPresenter), Arc::new(SilentBackend), None),
        };

    tracing::debug!(?mode, sound = config.sound.enabled, "Assembling monitor");

    let alerts = Arc::new(AlertSession::new(presenter, audio));
    let controller = Arc::new(MonitorController::new(config, alerts));
    Assembly {
        controller,
        console,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{MonitoringState, ServerStatus};

    #[test]
    fn test_headless_assembly_starts_idle() {
        let assembly = assemble(AlarmConfig::default(), Mode::Headless);
        assert!(assembly.console.is_none());
        let status = assembly.controller.current_status();
        assert_eq!(status.monitoring, MonitoringState::Idle);
        assert_eq!(status.server, ServerStatus::Unknown);
    }

    #[test]
    fn test_interactive_assembly_exposes_console() {
        let assembly = assemble(AlarmConfig::default(), Mode::Interactive);
        assert!(assembly.console.is_some());
    }
}
