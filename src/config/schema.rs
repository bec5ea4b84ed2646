//! Configuration schema definitions.
//!
//! Section and key names follow the alarm's config file layout (`[Server]`,
//! `[UI]`, `[Sound]`, `[Logging]`). Every key is optional and falls back to
//! the default documented on its field.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the server alarm.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AlarmConfig {
    /// Monitored target and polling schedule.
    #[serde(rename = "Server")]
    pub server: ServerConfig,

    /// Alert surface appearance, passed through to the presenter.
    #[serde(rename = "UI")]
    pub ui: UiConfig,

    /// Looped alarm sound.
    #[serde(rename = "Sound")]
    pub sound: SoundConfig,

    /// Log destination.
    #[serde(rename = "Logging")]
    pub logging: LoggingConfig,
}

/// How a probe decides reachability.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// System `ping` (ICMP echo).
    #[default]
    Icmp,
    /// TCP connect to `host:port`.
    Tcp,
}

/// Monitored server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Target host, optionally with a port (required for `tcp`).
    pub hostname: String,

    /// Seconds between probes.
    pub ping_interval: u64,

    /// Attempts per probe.
    pub ping_count: u32,

    /// Per-attempt timeout in seconds.
    pub timeout: u64,

    /// Probe mechanism.
    pub method: ProbeMethod,
}

impl ServerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "game.project-epoch.net:3724".to_string(),
            ping_interval: 5,
            ping_count: 1,
            timeout: 2,
            method: ProbeMethod::Icmp,
        }
    }
}

/// Alert window appearance.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub message_text: String,
    pub background_color: String,
    pub alert_color: String,
    pub button_color: String,
    pub text_color: String,

    /// Font family.
    pub family: String,

    /// Message font size.
    pub size: u32,

    /// Acknowledge button font size.
    pub button_size: u32,

    /// Font style (e.g. "bold").
    pub style: String,

    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 500,
            window_height: 250,
            window_title: "Server Status".to_string(),
            message_text: "SERVER IS UP!".to_string(),
            background_color: "#1E1E1E".to_string(),
            alert_color: "#FF5F57".to_string(),
            button_color: "#4CAF50".to_string(),
            text_color: "white".to_string(),
            family: "Arial".to_string(),
            size: 24,
            button_size: 16,
            style: "bold".to_string(),
            always_on_top: true,
        }
    }
}

/// Alarm sound configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SoundConfig {
    /// Play a looped sound while the alert is open.
    pub enabled: bool,

    /// Sound file. Relative paths resolve against the config file's directory.
    pub file: PathBuf,

    /// Player command override; the platform default is used when unset.
    pub player: Option<String>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: PathBuf::from("alarm.wav"),
            player: None,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only probe log.
    pub file: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("server_alarm.log"),
            level: "info".to_string(),
        }
    }
}
