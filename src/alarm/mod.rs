//! Alarm subsystem.
//!
//! # Data Flow
//! ```text
//! AlertSession::trigger(config)
//!     → session gate (one alert at a time)
//!     → sound.rs: SoundLoop::start (own task, device guard)
//!     → presenter.rs: AlertPresenter::present (blocks until acknowledged)
//!     → SoundHandle::stop (waits for device release)
//! ```
//!
//! # Design Decisions
//! - Poll-loop alerts queue behind an open alert; test alarms are rejected
//! - A missing or unplayable sound never prevents the alert from showing
//! - Presentation is a capability so the loop runs without a display

pub mod presenter;
pub mod session;
pub mod sound;

pub use presenter::{AlertPresenter, ConsolePresenter, HeadlessPresenter};
pub use session::{AlertError, AlertSession};
pub use sound::{AudioBackend, AudioDevice, CommandBackend, SilentBackend, SoundError, SoundHandle, SoundLoop};
