//! Stop, disconnect, teardown and degraded links.

use super::support::{Harness, periodic};
use cyclone_common::state::{ModeKind, SessionState};
use cyclone_common::transport::TransportError;
use cyclone_control::SchedulerTiming;
use cyclone_control::presentation::Severity;
use cyclone_control::rng::ScriptedRandom;
use std::time::Duration;

async fn running() -> Harness {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();
    for _ in 0..3 {
        h.scheduler.tick().await.unwrap();
    }
    h
}

#[tokio::test(start_paused = true)]
async fn stop_mode_sends_exactly_one_stop() {
    let mut h = running().await;
    h.probe.clear_packets();

    h.scheduler.stop_mode().await.unwrap();
    assert_eq!(h.probe.values(), vec![0]);
    assert_eq!(h.scheduler.state(), SessionState::ConnectedIdle);
    assert_eq!(h.scheduler.active_mode(), None);

    // idle: ticks do nothing
    assert!(h.scheduler.tick().await.is_none());
    assert_eq!(h.probe.values(), vec![0]);
    assert!(!h.panel.controls().mode_active);
}

#[tokio::test(start_paused = true)]
async fn toggle_starts_and_stops() {
    let mut h = Harness::new(periodic(20, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();

    h.scheduler.toggle_mode(ModeKind::Periodic).await.unwrap();
    assert_eq!(h.scheduler.active_mode(), Some(ModeKind::Periodic));
    assert!(h.panel.controls().mode_active);

    h.scheduler.toggle_mode(ModeKind::Periodic).await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::ConnectedIdle);
    assert_eq!(h.probe.values(), vec![0]);
}

#[tokio::test(start_paused = true)]
async fn disconnect_sends_courtesy_stop() {
    let mut h = running().await;
    h.probe.clear_packets();

    h.scheduler.disconnect().await.unwrap();
    assert_eq!(h.probe.values(), vec![0]);
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(!h.probe.is_connected());
    assert_eq!(h.panel.status().text, "Not connected");
    assert!(h.status_texts().iter().any(|t| t == "Disconnecting..."));
}

#[tokio::test(start_paused = true)]
async fn disconnect_completes_when_stop_fails() {
    let mut h = running().await;
    h.probe.clear_packets();
    h.probe.fail_next_sends(1);

    h.scheduler.disconnect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(h.probe.packets().is_empty());
    assert!(!h.probe.is_connected());
    assert!(h.panel.controls().connect_enabled);
}

#[tokio::test(start_paused = true)]
async fn disconnect_error_is_swallowed() {
    let mut h = running().await;
    h.probe.set_fail_disconnect(true);

    h.scheduler.disconnect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(!h.probe.is_connected());
}

#[tokio::test(start_paused = true)]
async fn hung_disconnect_still_drops_link_session() {
    let timing = SchedulerTiming {
        send_timeout: Duration::from_millis(300),
        ..SchedulerTiming::default()
    };
    let mut h = Harness::with_timing(periodic(50, 0, 10, 0), ScriptedRandom::new(), timing);
    h.scheduler.connect().await.unwrap();
    h.probe.hang_disconnect(true);

    h.scheduler.disconnect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert!(!h.probe.is_connected());
    assert_eq!(h.panel.status().text, "Not connected");

    // a new connect really opens a new session
    h.probe.hang_disconnect(false);
    h.scheduler.connect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::ConnectedIdle);
    assert_eq!(h.probe.connects(), 2);
}

#[tokio::test(start_paused = true)]
async fn stalled_send_times_out_and_loop_continues() {
    let timing = SchedulerTiming {
        send_timeout: Duration::from_millis(300),
        ..SchedulerTiming::default()
    };
    let mut h = Harness::with_timing(periodic(50, 0, 10, 0), ScriptedRandom::new(), timing);
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();

    h.probe.stall_sends(Some(Duration::from_secs(5)));
    let report = h.scheduler.tick().await.unwrap();
    assert_eq!(report.error, Some(TransportError::Timeout(Duration::from_millis(300))));
    assert_eq!(h.scheduler.stats().timeouts, 1);
    assert_eq!(h.scheduler.state(), SessionState::ConnectedActive);
    assert_eq!(h.panel.status().severity, Severity::Warning);
    assert!(h.probe.packets().is_empty());

    h.probe.stall_sends(None);
    let report = h.scheduler.tick().await.unwrap();
    assert!(report.delivered());
    assert_eq!(h.panel.status().text, "Connected");
    assert_eq!(h.probe.values(), vec![50]);
}

#[tokio::test(start_paused = true)]
async fn failed_sends_do_not_disconnect() {
    let mut h = running().await;
    h.probe.fail_next_sends(3);
    for _ in 0..3 {
        let report = h.scheduler.tick().await.unwrap();
        assert!(matches!(report.error, Some(TransportError::SendFailed(_))));
    }
    assert_eq!(h.scheduler.state(), SessionState::ConnectedActive);
    assert_eq!(h.scheduler.stats().failed_sends, 3);
    assert_eq!(h.scheduler.stats().consecutive_failures, 3);

    // one warning for the whole streak
    let warnings = h
        .panel
        .history()
        .iter()
        .filter(|s| s.severity == Severity::Warning)
        .count();
    assert_eq!(warnings, 1);

    let telemetry = h.panel.telemetry().unwrap();
    assert!(telemetry.send_error.is_some());
}

#[tokio::test(start_paused = true)]
async fn dropped_link_reports_not_connected() {
    let mut h = running().await;
    h.probe.drop_link();
    let sends = h.scheduler.stats().sends;

    let report = h.scheduler.tick().await.unwrap();
    assert_eq!(report.error, Some(TransportError::NotConnected));
    assert_eq!(h.scheduler.state(), SessionState::ConnectedActive);
    // nothing reached the link
    assert_eq!(h.scheduler.stats().sends, sends);
    assert_eq!(h.scheduler.stats().failed_sends, 1);

    h.scheduler.disconnect().await.unwrap();
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_and_disconnects() {
    let mut h = running().await;
    h.scheduler.shutdown().await;
    assert_eq!(h.scheduler.state(), SessionState::Disconnected);
    assert_eq!(h.probe.values().last(), Some(&0));
    assert!(!h.probe.is_connected());

    // shutdown while disconnected is a no-op
    let sent = h.probe.packets().len();
    h.scheduler.shutdown().await;
    assert_eq!(h.probe.packets().len(), sent);
}
