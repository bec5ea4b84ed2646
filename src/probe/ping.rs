//! ICMP echo via the system `ping` binary.
//!
//! # Responsibilities
//! - Build the platform's ping invocation (count and per-reply wait flags)
//! - Run it without output or console window
//! - Map the exit status to a ProbeOutcome
//!
//! # Design Decisions
//! - The whole invocation is bounded by attempts × timeout plus a grace period
//! - An overrun kills the child and counts as unreachable (code -1)
//! - `host:port` targets are pinged by host only

use std::net::SocketAddr;
use std::process::Stdio;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::process::Command;
use tokio::time;

use super::{check_arguments, ProbeError, ProbeOutcome, ReachabilityProbe};

const GRACE: Duration = Duration::from_secs(2);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Probe that shells out to `ping`.
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
}

impl PingProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(
        &self,
        target: &str,
        timeout: Duration,
        attempts: u32,
    ) -> Result<ProbeOutcome, ProbeError> {
        check_arguments(timeout, attempts)?;
        let host = host_only(target);
        if host.is_empty() {
            return Err(ProbeError::InvalidTarget {
                target: target.to_string(),
                reason: "empty host".to_string(),
            });
        }

        let mut command = Command::new(&self.program);
        command
            .args(ping_args(host, timeout, attempts))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = command.spawn().map_err(|source| ProbeError::Execution {
            program: self.program.clone(),
            source,
        })?;

        let budget = timeout.saturating_mul(attempts).saturating_add(GRACE);
        match time::timeout(budget, child.wait()).await {
            Ok(Ok(status)) => {
                let code = status.code().unwrap_or(-1);
                Ok(ProbeOutcome {
                    reachable: status.success(),
                    code,
                })
            }
            Ok(Err(source)) => Err(ProbeError::Execution {
                program: self.program.clone(),
                source,
            }),
            Err(_) => {
                tracing::debug!(host = %host, budget_ms = budget.as_millis() as u64, "ping overran its budget");
                let _ = child.kill().await;
                Ok(ProbeOutcome::unreachable(-1))
            }
        }
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new("ping")
    }
}

impl ReachabilityProbe for PingProbe {
    fn probe<'a>(
        &'a self,
        target: &'a str,
        timeout: Duration,
        attempts: u32,
    ) -> BoxFuture<'a, Result<ProbeOutcome, ProbeError>> {
        Box::pin(self.run(target, timeout, attempts))
    }
}

/// Strip a trailing `:port` that `ping` would not understand.
fn host_only(target: &str) -> &str {
    let target = target.trim();
    if target.parse::<SocketAddr>().is_ok() {
        if let Some(rest) = target.strip_prefix('[') {
            return rest.split(']').next().unwrap_or(rest);
        }
    }
    match target.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => host,
        _ => target,
    }
}

#[cfg(windows)]
fn ping_args(host: &str, timeout: Duration, attempts: u32) -> Vec<String> {
    vec![
        "-n".to_string(),
        attempts.to_string(),
        "-w".to_string(),
        timeout.as_millis().to_string(),
        host.to_string(),
    ]
}

#[cfg(target_os = "macos")]
fn ping_args(host: &str, timeout: Duration, attempts: u32) -> Vec<String> {
    vec![
        "-c".to_string(),
        attempts.to_string(),
        "-W".to_string(),
        timeout.as_millis().to_string(),
        host.to_string(),
    ]
}

#[cfg(not(any(windows, target_os = "macos")))]
fn ping_args(host: &str, timeout: Duration, attempts: u32) -> Vec<String> {
    vec![
        "-c".to_string(),
        attempts.to_string(),
        "-W".to_string(),
        timeout.as_secs().max(1).to_string(),
        host.to_string(),
    ]
}
