//! Looped alarm sound.
//!
//! # Responsibilities
//! - Acquire an audio device and play the alarm file on a loop
//! - Watch the cancellation signal every 200ms and restart finished passes
//! - Release the device on every exit path
//!
//! # Design Decisions
//! - The device lives in a guard owned by the sound task; dropping the guard
//!   is the only way it gets released, so release happens exactly once
//!   whether the loop is stopped, the handle is dropped, the task is aborted,
//!   or the file cannot be played
//! - Sound failures are reported, never propagated into the alert

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

/// How often the sound task checks for cancellation and finished passes.
pub const POLL_GRANULARITY: Duration = Duration::from_millis(200);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("sound file {0} not found")]
    FileMissing(PathBuf),

    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("playback of {file} failed: {reason}")]
    Playback { file: PathBuf, reason: String },

    #[error("sound worker ended abnormally: {0}")]
    Worker(String),
}

/// Source of audio devices.
pub trait AudioBackend: Send + Sync {
    fn acquire(&self) -> Result<Box<dyn AudioDevice>, SoundError>;
}

/// An acquired output that plays one pass of a file at a time.
pub trait AudioDevice: Send {
    /// Begin one pass of `file`.
    fn play(&mut self, file: &Path) -> Result<(), SoundError>;

    /// Returns `Ok(true)` once the current pass has finished.
    fn poll_finished(&mut self) -> Result<bool, SoundError>;

    /// Stop output and give the device back. Called exactly once.
    fn release(&mut self);
}

/// Owns a device and releases it on drop.
struct DeviceGuard {
    device: Box<dyn AudioDevice>,
}

impl Deref for DeviceGuard {
    type Target = dyn AudioDevice;
    fn deref(&self) -> &Self::Target {
        self.device.as_ref()
    }
}

impl DerefMut for DeviceGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.device.as_mut()
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        self.device.release();
        tracing::debug!("Audio device released");
    }
}

/// Entry point for starting looped playback.
pub struct SoundLoop;

impl SoundLoop {
    /// Start looping `file` on its own task.
    pub fn start(backend: Arc<dyn AudioBackend>, file: PathBuf) -> SoundHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let result = play_looped(backend.as_ref(), &file, stop_rx).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Alarm sound unavailable, continuing without audio");
            }
            result
        });

        SoundHandle {
            stop: stop_tx,
            task: Some(task),
        }
    }
}

/// Handle to a running sound loop.
///
/// Dropping the handle without calling [`SoundHandle::stop`] also ends the loop.
pub struct SoundHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<Result<(), SoundError>>>,
}

impl SoundHandle {
    /// Signal the loop to stop and wait until the device has been released.
    pub async fn stop(mut self) -> Result<(), SoundError> {
        let _ = self.stop.send(true);
        match self.task.take() {
            Some(task) => task.await.map_err(|e| SoundError::Worker(e.to_string()))?,
            None => Ok(()),
        }
    }
}

impl Drop for SoundHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

async fn play_looped(
    backend: &dyn AudioBackend,
    file: &Path,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SoundError> {
    let mut device = DeviceGuard {
        device: backend.acquire()?,
    };
    device.play(file)?;
    tracing::debug!(file = %file.display(), "Alarm sound started");

    let mut ticker = time::interval(POLL_GRANULARITY);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if device.poll_finished()? {
                    device.play(file)?;
                }
            }
            _ = stop.wait_for(|stopped| *stopped) => break,
        }
    }

    Ok(())
}

/// Plays each pass by spawning the platform's command-line player.
///
/// The running child process is the device; release kills and reaps it.
#[derive(Debug, Clone, Default)]
pub struct CommandBackend {
    player: Option<String>,
}

impl CommandBackend {
    /// `player` overrides the platform default; extra words are passed as
    /// leading arguments before the file.
    pub fn new(player: Option<String>) -> Self {
        Self { player }
    }
}

impl AudioBackend for CommandBackend {
    fn acquire(&self) -> Result<Box<dyn AudioDevice>, SoundError> {
        Ok(Box::new(CommandDevice {
            player: self.player.clone(),
            child: None,
            file: PathBuf::new(),
        }))
    }
}

struct CommandDevice {
    player: Option<String>,
    child: Option<Child>,
    file: PathBuf,
}

impl CommandDevice {
    fn command(&self, file: &Path) -> Result<Command, SoundError> {
        match &self.player {
            Some(player) => {
                let mut words = player.split_whitespace();
                let program = words
                    .next()
                    .ok_or_else(|| SoundError::DeviceUnavailable("empty player command".into()))?;
                let mut command = Command::new(program);
                command.args(words).arg(file);
                Ok(command)
            }
            None => Ok(platform_player(file)),
        }
    }
}

impl AudioDevice for CommandDevice {
    fn play(&mut self, file: &Path) -> Result<(), SoundError> {
        if !file.is_file() {
            return Err(SoundError::FileMissing(file.to_path_buf()));
        }
        let mut command = self.command(file)?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }
        let child = command
            .spawn()
            .map_err(|e| SoundError::DeviceUnavailable(e.to_string()))?;
        self.child = Some(child);
        self.file = file.to_path_buf();
        Ok(())
    }

    fn poll_finished(&mut self) -> Result<bool, SoundError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(true);
        };
        match child.try_wait() {
            Ok(None) => Ok(false),
            Ok(Some(status)) if status.success() => {
                self.child = None;
                Ok(true)
            }
            Ok(Some(status)) => {
                self.child = None;
                Err(SoundError::Playback {
                    file: self.file.clone(),
                    reason: format!("player exited with {}", status),
                })
            }
            Err(e) => Err(SoundError::Playback {
                file: self.file.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(target_os = "linux")]
fn platform_player(file: &Path) -> Command {
    let mut command = Command::new("aplay");
    command.arg("-q").arg(file);
    command
}

#[cfg(target_os = "macos")]
fn platform_player(file: &Path) -> Command {
    let mut command = Command::new("afplay");
    command.arg(file);
    command
}

#[cfg(windows)]
fn platform_player(file: &Path) -> Command {
    let script = format!(
        "(New-Object Media.SoundPlayer '{}').PlaySync()",
        file.display().to_string().replace('\'', "''")
    );
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
    command
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn platform_player(file: &Path) -> Command {
    let mut command = Command::new("play");
    command.arg("-q").arg(file);
    command
}

/// Acquires nothing and plays nothing; used when running headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn acquire(&self) -> Result<Box<dyn AudioDevice>, SoundError> {
        Ok(Box::new(SilentDevice))
    }
}

struct SilentDevice;

impl AudioDevice for SilentDevice {
    fn play(&mut self, file: &Path) -> Result<(), SoundError> {
        if !file.is_file() {
            return Err(SoundError::FileMissing(file.to_path_buf()));
        }
        Ok(())
    }

    fn poll_finished(&mut self) -> Result<bool, SoundError> {
        Ok(false)
    }

    fn release(&mut self) {}
}
