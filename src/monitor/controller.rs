//! Monitor controller: the poll worker and its start/stop protocol.
//!
//! # Responsibilities
//! - Own the shared status and publish it to subscribers
//! - Run at most one poll worker at a time
//! - Probe on schedule, raise the alert on the first success
//!
//! # Design Decisions
//! - Stop is cooperative: checked after each probe and during the sleep,
//!   never preempting a probe or an open alert
//! - A stopped worker discards any probe result still in flight; only the
//!   current worker writes server status
//! - The worker keeps the config snapshot it was started with
//! - Stopped workers still in an alert, and test alarms, stay tracked until
//!   they end so shutdown can abort them and release their sound

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Local;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use crate::alarm::{AlertError, AlertSession};
use crate::config::AlarmConfig;
use crate::monitor::status::{MonitoringState, ServerStatus, StatusSnapshot};
use crate::probe::{self, ReachabilityProbe};

struct PollWorker {
    id: u64,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Supervisor for the polling loop.
pub struct MonitorController {
    config: ArcSwap<AlarmConfig>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    alerts: Arc<AlertSession>,
    status: watch::Sender<StatusSnapshot>,
    worker: Mutex<Option<PollWorker>>,
    /// Stopped workers and test alarms that may still hold an alert.
    detached: Mutex<Vec<JoinHandle<()>>>,
    next_worker_id: AtomicU64,
}

/// Runs [`MonitorController::finish`] however the worker exits, panics included.
struct WorkerGuard {
    controller: Arc<MonitorController>,
    id: u64,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.controller.finish(self.id);
    }
}

impl MonitorController {
    /// The probe is chosen from `Server.method` each time monitoring starts.
    pub fn new(config: AlarmConfig, alerts: Arc<AlertSession>) -> Self {
        let (status, _) = watch::channel(StatusSnapshot::default());
        Self {
            config: ArcSwap::from_pointee(config),
            probe: None,
            alerts,
            status,
            worker: Mutex::new(None),
            detached: Mutex::new(Vec::new()),
            next_worker_id: AtomicU64::new(1),
        }
    }

    /// Use `probe` for every worker instead of choosing one from the config.
    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Begin monitoring. Returns false (and does nothing) if already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut slot = self.worker.lock();
        if slot.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            tracing::debug!("Monitoring already running");
            return false;
        }

        let config = self.config.load_full();
        let probe = self
            .probe
            .clone()
            .unwrap_or_else(|| probe::probe_for(&config.server));
        let id = self.next_worker_id.fetch_add(1, Ordering::Relaxed);
        let (stop_tx, stop_rx) = watch::channel(false);

        self.status.send_modify(|s| s.monitoring = MonitoringState::Running);

        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.poll(id, config, probe, stop_rx).await;
        });
        *slot = Some(PollWorker {
            id,
            stop: stop_tx,
            handle,
        });
        true
    }

    /// Ask the worker to stop at its next checkpoint. Returns false if idle.
    ///
    /// An alert that is already open stays open.
    pub fn stop(&self) -> bool {
        let mut slot = self.worker.lock();
        let Some(worker) = slot.take() else {
            return false;
        };
        let _ = worker.stop.send(true);
        self.detach(worker.handle);
        self.status.send_modify(|s| s.monitoring = MonitoringState::Idle);
        tracing::info!(worker = worker.id, "Monitoring stopped");
        true
    }

    /// Show the alert without touching monitoring state or server status.
    ///
    /// Refused while another alert is open.
    pub async fn test_alarm(&self) -> Result<(), AlertError> {
        let config = self.config.load_full();
        tracing::info!("Test alarm requested");
        self.alerts.try_trigger(&config).await
    }

    /// [`test_alarm`](Self::test_alarm) on its own task, tracked so that
    /// [`shutdown`](Self::shutdown) can end it.
    pub fn spawn_test_alarm(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            if let Err(e) = controller.test_alarm().await {
                tracing::warn!(error = %e, "Test alarm ignored");
            }
        });
        self.detach(handle);
    }

    /// Stop every worker and test alarm, even ones blocked in an alert, and
    /// wait until their sound devices are released.
    pub async fn shutdown(&self) {
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.stop.send(true);
            self.detach(worker.handle);
        }

        let tasks = std::mem::take(&mut *self.detached.lock());
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            let _ = task.await;
        }
        self.alerts.silence().await;

        self.status.send_modify(|s| s.monitoring = MonitoringState::Idle);
    }

    pub fn current_status(&self) -> StatusSnapshot {
        *self.status.borrow()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.current_status().monitoring == MonitoringState::Running
    }

    pub fn config(&self) -> Arc<AlarmConfig> {
        self.config.load_full()
    }

    /// Replace the stored config. A running worker keeps its own snapshot.
    pub fn update_config(&self, config: AlarmConfig) {
        self.config.store(Arc::new(config));
        tracing::info!("Configuration updated; applies from the next start");
    }

    async fn poll(
        self: Arc<Self>,
        id: u64,
        config: Arc<AlarmConfig>,
        probe: Arc<dyn ReachabilityProbe>,
        mut stop: watch::Receiver<bool>,
    ) {
        let _finish = WorkerGuard {
            controller: Arc::clone(&self),
            id,
        };
        let server = &config.server;
        tracing::info!(
            worker = id,
            host = %server.hostname,
            interval_secs = server.ping_interval,
            attempts = server.ping_count,
            "Monitoring started"
        );

        loop {
            if *stop.borrow() {
                break;
            }

            let started = Local::now();
            let result = probe
                .probe(&server.hostname, server.attempt_timeout(), server.ping_count)
                .await;

            if *stop.borrow() {
                tracing::debug!(worker = id, "Stopped during probe, discarding result");
                break;
            }

            let status = match result {
                Ok(outcome) => {
                    tracing::info!("Pinging {}... Response code: {}", server.hostname, outcome.code);
                    if outcome.reachable {
                        ServerStatus::Online
                    } else {
                        ServerStatus::Offline
                    }
                }
                Err(e) => {
                    tracing::warn!("Pinging {}... probe failed: {}", server.hostname, e);
                    ServerStatus::Offline
                }
            };
            self.status.send_modify(|s| s.record_probe(status, started));

            if status == ServerStatus::Online {
                self.alerts.trigger(&config).await;
                break;
            }

            tokio::select! {
                _ = time::sleep(server.interval()) => {}
                _ = stop.wait_for(|stopped| *stopped) => break,
            }
        }
    }

    fn detach(&self, task: JoinHandle<()>) {
        let mut detached = self.detached.lock();
        detached.retain(|t| !t.is_finished());
        detached.push(task);
    }

    fn finish(&self, id: u64) {
        let mut slot = self.worker.lock();
        if slot.as_ref().is_some_and(|w| w.id == id) {
            *slot = None;
            self.status.send_modify(|s| s.monitoring = MonitoringState::Idle);
            tracing::info!(worker = id, "Monitoring finished");
        }
    }
}
