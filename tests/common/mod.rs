//! Shared test doubles for the monitor and alarm integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::time::{self, Instant};

use server_alarm::alarm::{AlertPresenter, AlertSession, AudioBackend, AudioDevice, SilentBackend, SoundError};
use server_alarm::config::{AlarmConfig, UiConfig};
use server_alarm::monitor::{MonitorController, MonitoringState};
use server_alarm::probe::{ProbeError, ProbeOutcome, ReachabilityProbe};

/// One scripted probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Reachable,
    Unreachable,
    Fail,
}

/// Probe that replays a script, then repeats `fallback` forever.
pub struct ScriptedProbe {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    delay: Duration,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedProbe {
    pub fn new(steps: impl IntoIterator<Item = Step>, fallback: Step) -> Arc<Self> {
        Self::with_delay(steps, fallback, Duration::ZERO)
    }

    /// Each probe takes `delay` before answering.
    pub fn with_delay(
        steps: impl IntoIterator<Item = Step>,
        fallback: Step,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            fallback,
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Probe start times relative to `origin`.
    pub fn call_offsets(&self, origin: Instant) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(origin))
            .collect()
    }
}

impl ReachabilityProbe for ScriptedProbe {
    fn probe<'a>(
        &'a self,
        _target: &'a str,
        _timeout: Duration,
        _attempts: u32,
    ) -> BoxFuture<'a, Result<ProbeOutcome, ProbeError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Instant::now());
            let step = self.steps.lock().unwrap().pop_front().unwrap_or(self.fallback);
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
            match step {
                Step::Reachable => Ok(ProbeOutcome::reachable(0)),
                Step::Unreachable => Ok(ProbeOutcome::unreachable(1)),
                Step::Fail => Err(ProbeError::Execution {
                    program: "ping".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
                }),
            }
        })
    }
}

/// Presenter that counts alerts and optionally holds them open until released.
pub struct RecordingPresenter {
    presented: AtomicUsize,
    open: AtomicUsize,
    hold: bool,
    acks: Semaphore,
}

impl RecordingPresenter {
    /// Acknowledges every alert immediately.
    pub fn immediate() -> Arc<Self> {
        Self::build(false)
    }

    /// Keeps each alert open until [`acknowledge`](Self::acknowledge).
    pub fn holding() -> Arc<Self> {
        Self::build(true)
    }

    fn build(hold: bool) -> Arc<Self> {
        Arc::new(Self {
            presented: AtomicUsize::new(0),
            open: AtomicUsize::new(0),
            hold,
            acks: Semaphore::new(0),
        })
    }

    pub fn presented(&self) -> usize {
        self.presented.load(Ordering::SeqCst)
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn acknowledge(&self) {
        self.acks.add_permits(1);
    }

    pub async fn wait_until_presented(&self, count: usize) {
        time::timeout(Duration::from_secs(60), async {
            while self.presented() < count {
                time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("alert was never presented");
    }
}

impl AlertPresenter for RecordingPresenter {
    fn present<'a>(&'a self, _ui: &'a UiConfig) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.presented.fetch_add(1, Ordering::SeqCst);
            self.open.fetch_add(1, Ordering::SeqCst);
            let _open = OpenAlert(&self.open);
            if self.hold {
                if let Ok(permit) = self.acks.acquire().await {
                    permit.forget();
                }
            }
        })
    }
}

/// Closes the alert when acknowledged or when the alert future is dropped.
struct OpenAlert<'a>(&'a AtomicUsize);

impl Drop for OpenAlert<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Counters shared between a [`CountingBackend`] and the test.
#[derive(Default)]
pub struct AudioCounters {
    acquired: AtomicUsize,
    released: AtomicUsize,
    plays: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl AudioCounters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    /// Devices acquired and not yet released.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// Audio backend whose devices only count what happens to them.
///
/// Every pass finishes immediately, so the loop replays on each poll.
pub struct CountingBackend {
    counters: Arc<AudioCounters>,
}

impl CountingBackend {
    pub fn new() -> (Arc<dyn AudioBackend>, Arc<AudioCounters>) {
        let counters = Arc::new(AudioCounters::default());
        let backend = Arc::new(Self {
            counters: Arc::clone(&counters),
        });
        (backend, counters)
    }
}

impl AudioBackend for CountingBackend {
    fn acquire(&self) -> Result<Box<dyn AudioDevice>, SoundError> {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        let now_active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(now_active, Ordering::SeqCst);
        Ok(Box::new(CountingDevice {
            counters: Arc::clone(&self.counters),
            released: AtomicBool::new(false),
        }))
    }
}

struct CountingDevice {
    counters: Arc<AudioCounters>,
    released: AtomicBool,
}

impl AudioDevice for CountingDevice {
    fn play(&mut self, file: &Path) -> Result<(), SoundError> {
        if !file.is_file() {
            return Err(SoundError::FileMissing(file.to_path_buf()));
        }
        self.counters.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn poll_finished(&mut self) -> Result<bool, SoundError> {
        Ok(true)
    }

    fn release(&mut self) {
        assert!(
            !self.released.swap(true, Ordering::SeqCst),
            "device released twice"
        );
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Config with a fast schedule and sound off.
pub fn test_config(interval_secs: u64) -> AlarmConfig {
    let mut config = AlarmConfig::default();
    config.server.hostname = "monitored.test".into();
    config.server.ping_interval = interval_secs;
    config.sound.enabled = false;
    config
}

pub fn controller(
    config: AlarmConfig,
    probe: Arc<ScriptedProbe>,
    presenter: Arc<RecordingPresenter>,
) -> Arc<MonitorController> {
    controller_with_audio(config, probe, presenter, Arc::new(SilentBackend))
}

pub fn controller_with_audio(
    config: AlarmConfig,
    probe: Arc<ScriptedProbe>,
    presenter: Arc<RecordingPresenter>,
    audio: Arc<dyn AudioBackend>,
) -> Arc<MonitorController> {
    let alerts = Arc::new(AlertSession::new(presenter, audio));
    Arc::new(MonitorController::new(config, alerts).with_probe(probe))
}

pub async fn wait_until_idle(controller: &MonitorController) {
    let mut status = controller.subscribe();
    time::timeout(Duration::from_secs(60), async {
        let _ = status
            .wait_for(|s| s.monitoring == MonitoringState::Idle)
            .await
            .map(|_| ());
    })
    .await
    .expect("monitor never became idle");
}
