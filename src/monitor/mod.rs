//! Reachability monitoring subsystem.
//!
//! # State Machine
//! ```text
//!            start()                    probe unreachable
//!   Idle ─────────────► Running ◄──────────────────────┐
//!    ▲                   │   │                         │
//!    │      stop()       │   │ sleep(interval) ────────┘
//!    ├───────────────────┘   │
//!    │                       │ probe reachable
//!    │   alert acknowledged  ▼
//!    └───────────────── Alerting (still Running)
//! ```
//!
//! # Design Decisions
//! - controller.rs owns all cross-task mutable state
//! - status.rs snapshots are published through a watch channel
//! - test alarms bypass the state machine entirely

pub mod controller;
pub mod status;

pub use controller::MonitorController;
pub use status::{MonitoringState, ServerStatus, StatusSnapshot};
