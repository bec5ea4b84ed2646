//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval, attempts and timeout > 0)
//! - Reset offending keys to their documented defaults
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AlarmConfig → Result<(), Vec<ValidationError>>
//! - A bad key never invalidates the rest of the file

use thiserror::Error;

use crate::config::schema::{AlarmConfig, ServerConfig, SoundConfig};

/// A single semantic problem in an otherwise parseable config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Server.hostname must not be empty")]
    EmptyHostname,

    #[error("Server.ping_interval must be at least 1 second")]
    ZeroInterval,

    #[error("Server.ping_count must be at least 1")]
    ZeroAttempts,

    #[error("Server.timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("Sound.file must not be empty while sound is enabled")]
    EmptySoundFile,
}

pub fn validate_config(config: &AlarmConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.hostname.trim().is_empty() {
        errors.push(ValidationError::EmptyHostname);
    }
    if config.server.ping_interval == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.server.ping_count == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.server.timeout == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.sound.enabled && config.sound.file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySoundFile);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Replace every key named by `errors` with its default value.
pub fn repair_config(config: &mut AlarmConfig, errors: &[ValidationError]) {
    let server = ServerConfig::default();
    let sound = SoundConfig::default();

    for error in errors {
        match error {
            ValidationError::EmptyHostname => config.server.hostname = server.hostname.clone(),
            ValidationError::ZeroInterval => config.server.ping_interval = server.ping_interval,
            ValidationError::ZeroAttempts => config.server.ping_count = server.ping_count,
            ValidationError::ZeroTimeout => config.server.timeout = server.timeout,
            ValidationError::EmptySoundFile => config.sound.file = sound.file.clone(),
        }
    }
}
