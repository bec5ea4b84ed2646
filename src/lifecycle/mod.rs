//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Assemble alarm + controller → Autostart
//!
//! Shutdown (shutdown.rs):
//!     Quit → Stop poll worker → Release sound → Stop front-end tasks → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Quit command
//!     second SIGINT → forced exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{assemble, Assembly, Mode};
