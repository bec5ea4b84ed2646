//! Reachability probing.
//!
//! # Data Flow
//! ```text
//! poll worker
//!     → ReachabilityProbe::probe(target, timeout, attempts)
//!     → ping.rs (system ping, exit status = response code)
//!       or tcp.rs (connect to host:port)
//!     → ProbeOutcome { reachable, code } | ProbeError
//! ```
//!
//! # Design Decisions
//! - An unreachable host is an outcome, not an error
//! - ProbeError only means the check itself could not run
//! - Every probe is bounded; nothing waits on the network forever

pub mod ping;
pub mod tcp;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::{ProbeMethod, ServerConfig};

pub use ping::PingProbe;
pub use tcp::TcpProbe;

/// Result of one completed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
    /// Mechanism-specific response code (ping's exit status, 0/1 for TCP).
    pub code: i32,
}

impl ProbeOutcome {
    pub fn reachable(code: i32) -> Self {
        Self { reachable: true, code }
    }

    pub fn unreachable(code: i32) -> Self {
        Self {
            reachable: false,
            code,
        }
    }
}

/// The reachability mechanism itself failed to run.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to execute {program}: {source}")]
    Execution {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid probe target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("probe needs at least one attempt and a non-zero timeout")]
    InvalidArguments,
}

/// One reachability check against a target.
pub trait ReachabilityProbe: Send + Sync {
    fn probe<'a>(
        &'a self,
        target: &'a str,
        timeout: Duration,
        attempts: u32,
    ) -> BoxFuture<'a, Result<ProbeOutcome, ProbeError>>;
}

/// Build the probe selected by `Server.method`.
pub fn probe_for(config: &ServerConfig) -> Arc<dyn ReachabilityProbe> {
    match config.method {
        ProbeMethod::Icmp => Arc::new(PingProbe::default()),
        ProbeMethod::Tcp => Arc::new(TcpProbe),
    }
}

fn check_arguments(timeout: Duration, attempts: u32) -> Result<(), ProbeError> {
    if attempts == 0 || timeout.is_zero() {
        return Err(ProbeError::InvalidArguments);
    }
    Ok(())
}
