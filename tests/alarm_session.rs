//! Alert session and sound loop resource handling.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use server_alarm::alarm::{AlertSession, SoundError, SoundLoop};
use server_alarm::config::AlarmConfig;

mod common;

use common::{CountingBackend, RecordingPresenter};

fn alarm_config(sound_file: PathBuf) -> AlarmConfig {
    let mut config = AlarmConfig::default();
    config.sound.enabled = true;
    config.sound.file = sound_file;
    config
}

#[tokio::test(start_paused = true)]
async fn test_missing_sound_file_still_presents_alert() {
    let (audio, counters) = CountingBackend::new();
    let presenter = RecordingPresenter::immediate();
    let session = AlertSession::new(presenter.clone(), audio);

    session
        .trigger(&alarm_config(PathBuf::from("/nonexistent/alarm.wav")))
        .await;

    assert_eq!(presenter.presented(), 1);
    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
    assert_eq!(counters.plays(), 0);
    assert!(!session.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_sound_plays_for_as_long_as_the_alert_is_open() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (audio, counters) = CountingBackend::new();
    let presenter = RecordingPresenter::holding();
    let session = Arc::new(AlertSession::new(presenter.clone(), audio));

    let alert = {
        let session = session.clone();
        let config = alarm_config(file.path().to_path_buf());
        tokio::spawn(async move { session.trigger(&config).await })
    };
    presenter.wait_until_presented(1).await;
    time::sleep(Duration::from_secs(1)).await;

    assert!(session.is_active());
    assert_eq!(counters.active(), 1);
    assert!(counters.plays() > 1, "finished passes should be replayed");

    presenter.acknowledge();
    alert.await.unwrap();

    // trigger() returns only after the device is back.
    assert_eq!(counters.active(), 0);
    assert_eq!(counters.released(), 1);
    assert!(!session.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_sound_never_touches_the_device() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (audio, counters) = CountingBackend::new();
    let presenter = RecordingPresenter::immediate();
    let session = AlertSession::new(presenter.clone(), audio);

    let mut config = alarm_config(file.path().to_path_buf());
    config.sound.enabled = false;
    session.trigger(&config).await;

    assert_eq!(presenter.presented(), 1);
    assert_eq!(counters.acquired(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_queued_alerts_never_overlap_sound_loops() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (audio, counters) = CountingBackend::new();
    let presenter = RecordingPresenter::holding();
    let session = Arc::new(AlertSession::new(presenter.clone(), audio));
    let config = Arc::new(alarm_config(file.path().to_path_buf()));

    let mut alerts = Vec::new();
    for _ in 0..2 {
        let session = session.clone();
        let config = config.clone();
        alerts.push(tokio::spawn(async move { session.trigger(&config).await }));
    }

    presenter.wait_until_presented(1).await;
    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(presenter.presented(), 1);

    presenter.acknowledge();
    presenter.wait_until_presented(2).await;
    presenter.acknowledge();
    for alert in alerts {
        alert.await.unwrap();
    }

    assert_eq!(counters.acquired(), 2);
    assert_eq!(counters.released(), 2);
    assert_eq!(counters.max_active(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_mid_playback_releases_once() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (audio, counters) = CountingBackend::new();

    let handle = SoundLoop::start(audio, file.path().to_path_buf());
    time::sleep(Duration::from_millis(700)).await;
    assert_eq!(counters.active(), 1);

    assert!(handle.stop().await.is_ok());
    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_handle_releases_device() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let (audio, counters) = CountingBackend::new();

    let handle = SoundLoop::start(audio, file.path().to_path_buf());
    time::sleep(Duration::from_millis(300)).await;
    drop(handle);
    time::sleep(Duration::from_millis(500)).await;

    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_file_releases_device_and_reports() {
    let (audio, counters) = CountingBackend::new();

    let handle = SoundLoop::start(audio, PathBuf::from("/nonexistent/alarm.wav"));
    let result = handle.stop().await;

    assert!(matches!(result, Err(SoundError::FileMissing(_))));
    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
}
