//! Hot reload of the alarm config file.
//!
//! # Design Decisions
//! - A file that cannot be read or parsed (mid-save, typo) is logged and
//!   skipped; the controller keeps the config it already has
//! - Invalid keys in a parseable file are reset to defaults and the rest of
//!   the file still applies

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::reload_config;
use crate::config::schema::AlarmConfig;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Watches one config file and forwards every successful reload.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<AlarmConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AlarmConfig>) {
        let (updates, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, update_rx)
    }

    /// Begin watching. Reloads stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, updates } = self;
        let reload_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                match reload_config(&reload_path) {
                    Ok(config) => {
                        tracing::info!(host = %config.server.hostname, "Config file reloaded");
                        let _ = updates.send(config);
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %reload_path.display(),
                            error = %e,
                            "Config reload skipped, keeping current settings"
                        );
                    }
                }
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "Watching config file");
        Ok(watcher)
    }
}
