//! Autonomous randomizer through the full send path.

use super::support::{Harness, periodic};
use cyclone_common::command::{CommandState, Direction};
use cyclone_common::state::ModeKind;
use cyclone_control::rng::{ScriptedRandom, SystemRandom};

#[tokio::test(start_paused = true)]
async fn halt_tier_sends_stop_code() {
    // change 0.5 (speed is 0, so re-roll), tier draw 0.15 → halt
    let rng = ScriptedRandom::new().with_units([0.5, 0.15]);
    let mut h = Harness::new(periodic(0, 0, 10, 0), rng);
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Randomizer).unwrap();

    let report = h.scheduler.tick().await.unwrap();
    assert_eq!(report.command, CommandState::STOP);
    assert!(report.packet.is_stop());
    assert_eq!(h.probe.values(), vec![0]);
}

#[tokio::test(start_paused = true)]
async fn tier_then_walk_then_hold() {
    let rng = ScriptedRandom::new()
        // tick 1: re-roll (speed 0) into cruise, flip
        .with_units([0.5, 0.3])
        // tick 2: walk, flip
        .with_units([0.4])
        // tick 3: walk, hold
        .with_units([0.95])
        .with_ints([50, 3, -2]);
    let mut h = Harness::new(periodic(0, 0, 10, 0), rng);
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Randomizer).unwrap();

    let mut commands = Vec::new();
    for _ in 0..3 {
        commands.push(h.scheduler.tick().await.unwrap().command);
    }
    assert_eq!(
        commands,
        vec![
            CommandState::new(50, Direction::Reverse),
            CommandState::new(53, Direction::Forward),
            CommandState::new(51, Direction::Forward),
        ]
    );
    assert_eq!(h.probe.values(), vec![178, 53, 51]);
}

#[tokio::test(start_paused = true)]
async fn restart_resets_runtime() {
    let rng = ScriptedRandom::new()
        .with_units([0.5, 0.9])
        .with_ints([90])
        // after restart the runtime is back at speed 0: re-roll again
        .with_units([0.95, 0.3])
        .with_ints([45]);
    let mut h = Harness::new(periodic(0, 0, 10, 0), rng);
    h.scheduler.connect().await.unwrap();

    h.scheduler.start_mode(ModeKind::Randomizer).unwrap();
    assert_eq!(h.scheduler.tick().await.unwrap().command.speed, 90);
    h.scheduler.stop_mode().await.unwrap();

    h.scheduler.start_mode(ModeKind::Randomizer).unwrap();
    let command = h.scheduler.tick().await.unwrap().command;
    assert_eq!(command, CommandState::new(45, Direction::Forward));
}

#[tokio::test(start_paused = true)]
async fn every_packet_is_in_band() {
    let mut h = Harness::new(periodic(0, 0, 10, 0), SystemRandom::seeded(2024));
    h.scheduler.connect().await.unwrap();
    h.scheduler.start_mode(ModeKind::Randomizer).unwrap();

    for _ in 0..2_000 {
        let report = h.scheduler.tick().await.unwrap();
        let v = report.packet.value();
        assert!(v <= 100 || (128..=228).contains(&v), "value {v} out of band");
        assert_eq!(report.command.speed == 0, v == 0);
    }
    assert_eq!(h.probe.packets().len(), 2_000);
    assert_eq!(h.scheduler.stats().failed_sends, 0);
}
