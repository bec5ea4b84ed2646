//! TCP connect probing.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::net::{lookup_host, TcpStream};
use tokio::time;

use super::{check_arguments, ProbeError, ProbeOutcome, ReachabilityProbe};

/// Probe that opens (and immediately drops) a TCP connection to `host:port`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl TcpProbe {
    async fn run(
        &self,
        target: &str,
        timeout: Duration,
        attempts: u32,
    ) -> Result<ProbeOutcome, ProbeError> {
        check_arguments(timeout, attempts)?;

        let addrs: Vec<SocketAddr> = lookup_host(target)
            .await
            .map_err(|e| ProbeError::InvalidTarget {
                target: target.to_string(),
                reason: e.to_string(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ProbeError::InvalidTarget {
                target: target.to_string(),
                reason: "resolved to no addresses".to_string(),
            });
        }

        for attempt in 1..=attempts {
            for addr in &addrs {
                match time::timeout(timeout, TcpStream::connect(addr)).await {
                    Ok(Ok(_stream)) => return Ok(ProbeOutcome::reachable(0)),
                    Ok(Err(e)) => {
                        tracing::debug!(addr = %addr, attempt, error = %e, "TCP connect failed");
                    }
                    Err(_) => {
                        tracing::debug!(addr = %addr, attempt, "TCP connect timed out");
                    }
                }
            }
        }

        Ok(ProbeOutcome::unreachable(1))
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe<'a>(
        &'a self,
        target: &'a str,
        timeout: Duration,
        attempts: u32,
    ) -> BoxFuture<'a, Result<ProbeOutcome, ProbeError>> {
        Box::pin(self.run(target, timeout, attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_listening_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap().to_string();

        let outcome = TcpProbe.probe(&target, Duration::from_secs(1), 1).await.unwrap();
        assert_eq!(outcome, ProbeOutcome::reachable(0));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable_not_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap().to_string();
        drop(listener);

        let outcome = TcpProbe.probe(&target, Duration::from_secs(1), 2).await.unwrap();
        assert_eq!(outcome, ProbeOutcome::unreachable(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_connects_are_bounded_per_attempt() {
        // TEST-NET-1: never routed, so each connect either hangs or fails fast.
        let started = tokio::time::Instant::now();
        let outcome = TcpProbe
            .probe("192.0.2.1:9", Duration::from_secs(2), 2)
            .await
            .unwrap();

        assert_eq!(outcome, ProbeOutcome::unreachable(1));
        assert!(started.elapsed() <= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_portless_target_is_invalid() {
        let result = TcpProbe.probe("localhost", Duration::from_secs(1), 1).await;
        assert!(matches!(result, Err(ProbeError::InvalidTarget { .. })));
    }
}
