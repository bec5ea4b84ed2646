//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AlarmConfig;
use crate::config::validation::{repair_config, validate_config, ValidationError};

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "server-alarm.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AlarmConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration, falling back to defaults instead of failing.
///
/// An unreadable or unparseable file yields the full default config; keys that
/// parse but fail validation are reset individually. The problem, if any, is
/// returned alongside so the caller can report it once logging is up.
pub fn load_with_fallback(path: &Path) -> (AlarmConfig, Option<ConfigError>) {
    let mut config = match read_config(path) {
        Ok(config) => config,
        Err(e) => {
            let mut config = AlarmConfig::default();
            resolve_paths(&mut config, path);
            return (config, Some(e));
        }
    };

    match validate_config(&config) {
        Ok(()) => (config, None),
        Err(errors) => {
            repair_config(&mut config, &errors);
            resolve_paths(&mut config, path);
            (config, Some(ConfigError::Validation(errors)))
        }
    }
}

/// Re-read the file for a hot reload.
///
/// Unlike [`load_with_fallback`], an unreadable or unparseable file is an
/// error so the caller keeps the config it already has. Invalid keys are
/// still repaired and reported.
pub fn reload_config(path: &Path) -> Result<AlarmConfig, ConfigError> {
    let mut config = read_config(path)?;
    if let Err(errors) = validate_config(&config) {
        repair_config(&mut config, &errors);
        resolve_paths(&mut config, path);
        report_fallback(path, &ConfigError::Validation(errors));
    }
    Ok(config)
}

pub fn report_fallback(path: &Path, error: &ConfigError) {
    match error {
        ConfigError::Validation(errors) => {
            for error in errors {
                tracing::warn!(path = %path.display(), "{}; using default", error);
            }
        }
        other => {
            tracing::warn!(path = %path.display(), error = %other, "Using default configuration");
        }
    }
}

/// Where to look for the config file: next to the executable if one exists
/// there, otherwise the working directory.
pub fn default_config_path() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)));

    match beside_exe {
        Some(path) if path.exists() => path,
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

fn read_config(path: &Path) -> Result<AlarmConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: AlarmConfig = toml::from_str(&content)?;
    resolve_paths(&mut config, path);
    Ok(config)
}

fn resolve_paths(config: &mut AlarmConfig, config_path: &Path) {
    let Some(base) = config_path.parent() else {
        return;
    };
    if config.sound.file.is_relative() && !config.sound.file.as_os_str().is_empty() {
        config.sound.file = base.join(&config.sound.file);
    }
    if config.logging.file.is_relative() {
        config.logging.file = base.join(&config.logging.file);
    }
}
