//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! controller, probes, alarm
//!     → tracing events with structured fields
//!     → logging.rs
//!         → console (human readable)
//!         → server_alarm.log (timestamp - message, append-only)
//! ```

pub mod logging;

pub use logging::init_logging;
