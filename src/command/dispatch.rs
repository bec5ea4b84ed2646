//! Command dispatch into the monitor controller.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::command::Command;
use crate::monitor::MonitorController;

/// Applies commands to one controller, in arrival order.
pub struct CommandDispatcher {
    controller: Arc<MonitorController>,
    commands: mpsc::Receiver<Command>,
}

impl CommandDispatcher {
    pub fn new(controller: Arc<MonitorController>, commands: mpsc::Receiver<Command>) -> Self {
        Self {
            controller,
            commands,
        }
    }

    /// Run until `Quit` arrives or every sender is gone, then shut the
    /// controller down.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            tracing::debug!(%command, "Command received");
            match command {
                Command::Start => {
                    if !self.controller.start() {
                        tracing::info!("Monitoring is already running");
                    }
                }
                Command::Stop => {
                    if !self.controller.stop() {
                        tracing::info!("Monitoring is not running");
                    }
                }
                // Blocks until acknowledged, so it runs beside the dispatch loop.
                Command::TestAlarm => self.controller.spawn_test_alarm(),
                Command::Quit => break,
            }
        }

        tracing::info!("Shutting down monitor");
        self.controller.shutdown().await;
    }
}
