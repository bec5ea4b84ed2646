//! Alert sessions: one alert, one sound loop, one acknowledgment.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::alarm::presenter::AlertPresenter;
use crate::alarm::sound::{AudioBackend, SoundHandle, SoundLoop};
use crate::config::AlarmConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlertError {
    #[error("an alert is already being shown")]
    SessionActive,
}

/// Serializes alerts so that at most one is shown, and at most one sound
/// loop plays, at any time.
pub struct AlertSession {
    presenter: Arc<dyn AlertPresenter>,
    audio: Arc<dyn AudioBackend>,
    gate: Mutex<()>,
    /// Sound of the open alert. Survives an aborted alert until
    /// [`AlertSession::silence`].
    sound: parking_lot::Mutex<Option<SoundHandle>>,
}

impl AlertSession {
    pub fn new(presenter: Arc<dyn AlertPresenter>, audio: Arc<dyn AudioBackend>) -> Self {
        Self {
            presenter,
            audio,
            gate: Mutex::new(()),
            sound: parking_lot::Mutex::new(None),
        }
    }

    /// Show an alert and wait for acknowledgment, queueing behind any alert
    /// that is already open.
    pub async fn trigger(&self, config: &AlarmConfig) {
        let _active = self.gate.lock().await;
        self.run(config).await;
    }

    /// Like [`trigger`](Self::trigger), but refuses instead of queueing.
    pub async fn try_trigger(&self, config: &AlarmConfig) -> Result<(), AlertError> {
        let _active = self.gate.try_lock().map_err(|_| AlertError::SessionActive)?;
        self.run(config).await;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    /// Stop any sound left behind by an abandoned alert and wait until its
    /// device is released.
    pub async fn silence(&self) {
        let sound = self.sound.lock().take();
        if let Some(sound) = sound {
            let _ = sound.stop().await;
            tracing::debug!("Abandoned alert sound stopped");
        }
    }

    async fn run(&self, config: &AlarmConfig) {
        tracing::info!(text = %config.ui.message_text, "Alert raised");

        if config.sound.enabled {
            let sound = SoundLoop::start(Arc::clone(&self.audio), config.sound.file.clone());
            *self.sound.lock() = Some(sound);
        }

        self.presenter.present(&config.ui).await;

        let sound = self.sound.lock().take();
        if let Some(sound) = sound {
            // Failures were already logged by the sound task.
            let _ = sound.stop().await;
        }
        tracing::info!("Alert acknowledged");
    }
}
