//! Connection failures and recovery.

use super::support::{Harness, periodic};
use cyclone_common::state::{ModeKind, SessionState};
use cyclone_common::transport::TransportError;
use cyclone_common::types::DeviceId;
use cyclone_control::ControlError;
use cyclone_control::presentation::{ConnectAction, Severity};
use cyclone_control::rng::ScriptedRandom;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn unknown_device_is_not_found() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new())
        .targeting(DeviceId::with_address("00:11:22:33:44:55"));

    let started = Instant::now();
    let result = h.scheduler.connect().await;
    assert!(matches!(
        result,
        Err(ControlError::Transport(TransportError::DeviceNotFound(_)))
    ));
    assert!(started.elapsed() >= Duration::from_secs(5));

    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(matches!(
        h.scheduler.last_error(),
        Some(TransportError::DeviceNotFound(_))
    ));

    let controls = h.panel.controls();
    assert!(controls.connect_enabled);
    assert_eq!(controls.connect_action, ConnectAction::Connect);
    assert!(!controls.mode_enabled);

    let status = h.panel.status();
    assert_eq!(status.text, "Device not found");
    assert_eq!(status.severity, Severity::Error);
    assert!(!h.status_texts().iter().any(|t| t == "Connected"));
    assert_eq!(h.probe.connects(), 0);
}

#[tokio::test(start_paused = true)]
async fn refused_connection_is_reported() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.probe.set_refuse(true);

    let result = h.scheduler.connect().await;
    assert!(matches!(
        result,
        Err(ControlError::Transport(TransportError::ConnectionFailed(_)))
    ));
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(h.panel.status().text.starts_with("Connection error"));
}

#[tokio::test(start_paused = true)]
async fn connect_can_be_retried() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.probe.set_hidden(true);
    assert!(h.scheduler.connect().await.is_err());

    h.probe.set_hidden(false);
    h.scheduler.connect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::ConnectedIdle);
    assert!(h.scheduler.last_error().is_none());
    assert_eq!(h.panel.status().severity, Severity::Success);
}

#[tokio::test(start_paused = true)]
async fn commands_before_connect_are_rejected() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());

    let err = h.scheduler.start_mode(ModeKind::Periodic).unwrap_err();
    assert!(err.is_rejection());
    assert!(h.scheduler.stop_mode().await.unwrap_err().is_rejection());
    assert!(h.scheduler.disconnect().await.unwrap_err().is_rejection());
    assert!(h.scheduler.tick().await.is_none());

    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(h.probe.packets().is_empty());
}

#[tokio::test(start_paused = true)]
async fn second_connect_is_rejected() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    assert!(h.scheduler.connect().await.unwrap_err().is_rejection());
    assert_eq!(h.scheduler.state(), SessionState::ConnectedIdle);
    assert_eq!(h.probe.connects(), 1);
}
