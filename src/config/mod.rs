//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! server-alarm.toml
//!     → loader.rs (parse & deserialize, resolve relative paths)
//!     → validation.rs (semantic checks, per-key repair)
//!     → AlarmConfig (immutable snapshot)
//!     → stored in the controller's ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs reloads (unreadable or unparseable: keep current)
//!     → controller swaps the stored snapshot
//!     → next start()/test_alarm() observes it
//! ```
//!
//! # Design Decisions
//! - Config errors are never fatal; every key has a default
//! - A running poll worker keeps the snapshot it started with
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::{AlarmConfig, LoggingConfig, ProbeMethod, ServerConfig, SoundConfig, UiConfig};
