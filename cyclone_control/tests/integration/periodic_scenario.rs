//! Periodic oscillator through the full send path.

use super::support::{Harness, periodic};
use cyclone_common::command::{CommandState, Direction};
use cyclone_common::state::{ModeKind, SessionState};
use cyclone_common::types::PeriodicField;
use cyclone_control::presentation::Presenter;
use cyclone_control::rng::ScriptedRandom;

#[tokio::test(start_paused = true)]
async fn forward_until_tenth_tick_then_reverse() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();
    assert_eq!(h.scheduler.state(), SessionState::ConnectedActive);

    for _ in 0..10 {
        let report = h.scheduler.tick().await.unwrap();
        assert!(report.delivered());
    }

    let mut expected = vec![50u8; 9];
    expected.push(178);
    assert_eq!(h.probe.values(), expected);
    assert_eq!(h.probe.commanded(), CommandState::new(50, Direction::Reverse));
    assert_eq!(h.probe.reversals(), 1);
}

#[tokio::test(start_paused = true)]
async fn reverses_every_period() {
    let mut h = Harness::new(periodic(30, 0, 3, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();
    for _ in 0..12 {
        h.scheduler.tick().await.unwrap();
    }
    // flips on ticks 3, 6, 9, 12
    assert_eq!(h.probe.reversals(), 4);
    assert_eq!(
        h.probe.values(),
        vec![30, 30, 158, 158, 158, 30, 30, 30, 158, 158, 158, 30]
    );
}

#[tokio::test(start_paused = true)]
async fn telemetry_counts_down_to_reversal() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();
    for _ in 0..3 {
        h.scheduler.tick().await.unwrap();
    }
    let telemetry = h.panel.telemetry().unwrap();
    assert_eq!(telemetry.steps_until_reversal, Some(7));
    assert_eq!(telemetry.to_string(), "[FWD] speed: 50 (reversal in: 7)");
}

#[tokio::test(start_paused = true)]
async fn live_edits_apply_on_next_tick() {
    let mut h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();
    h.scheduler.tick().await.unwrap();

    h.panel.set_field(PeriodicField::BaseSpeed, 80);
    let report = h.scheduler.tick().await.unwrap();
    assert_eq!(report.command.speed, 80);

    // out-of-range edits are clamped
    h.panel.set_field(PeriodicField::BaseSpeed, 400);
    assert_eq!(h.panel.periodic_config().base_speed, 100);
    assert_eq!(h.scheduler.tick().await.unwrap().packet.value(), 100);
}

#[tokio::test(start_paused = true)]
async fn jitter_draws_shape_the_output() {
    // start: period draw; ticks: speed draw each, plus a period draw at the flip
    let rng = ScriptedRandom::new().with_ints([-1, 5, -5, 1]);
    let mut h = Harness::new(periodic(40, 5, 3, 1), rng);
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Periodic).unwrap();

    let first = h.scheduler.tick().await.unwrap().command;
    let second = h.scheduler.tick().await.unwrap().command;
    assert_eq!(first, CommandState::new(45, Direction::Forward));
    assert_eq!(second, CommandState::new(35, Direction::Reverse));

    // period redrawn at the flip: 3 + 1
    let telemetry = h.panel.telemetry().unwrap();
    assert_eq!(telemetry.steps_until_reversal, Some(4));
}
