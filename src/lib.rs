//! Server alarm library: watches one host and raises a blocking alert with a
//! looped sound the moment it becomes reachable.

pub mod alarm;
pub mod command;
pub mod config;
pub mod frontend;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod probe;

pub use alarm::AlertSession;
pub use command::Command;
pub use config::AlarmConfig;
pub use monitor::MonitorController;
