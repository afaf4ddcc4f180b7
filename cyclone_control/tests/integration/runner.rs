//! The cooperative cycle: commands and ticks on one task.

use super::support::{Harness, periodic};
use cyclone_common::state::{ModeKind, SessionState};
use cyclone_common::types::PeriodicField;
use cyclone_control::CycleRunner;
use cyclone_control::console::input::OperatorCommand;
use cyclone_control::presentation::{Presenter, Severity};
use cyclone_control::rng::{ScriptedRandom, SystemRandom};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn periodic_cycle_from_connect_to_quit() {
    let h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    let probe = h.probe.clone();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(CycleRunner::new(h.scheduler, h.panel, ModeKind::Periodic, rx).run());

    tx.send(OperatorCommand::Connect).await.unwrap();
    tx.send(OperatorCommand::Start).await.unwrap();

    // connected at 200 ms, ticks at 300..=1200 ms
    sleep(Duration::from_millis(1_250)).await;
    let mut expected = vec![50u8; 9];
    expected.push(178);
    assert_eq!(probe.values(), expected);

    tx.send(OperatorCommand::Stop).await.unwrap();
    sleep(Duration::from_millis(500)).await;
    assert_eq!(probe.values().len(), 11);
    assert_eq!(probe.values().last(), Some(&0));

    tx.send(OperatorCommand::Quit).await.unwrap();
    let scheduler = task.await.unwrap();
    assert_eq!(scheduler.state(), SessionState::Disconnected);
    assert_eq!(scheduler.stats().ticks, 10);
    // courtesy stop on the way out
    assert_eq!(probe.values().len(), 12);
    assert!(!probe.is_connected());
}

#[tokio::test(start_paused = true)]
async fn no_ticks_while_idle() {
    let h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    let probe = h.probe.clone();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(CycleRunner::new(h.scheduler, h.panel, ModeKind::Periodic, rx).run());

    tx.send(OperatorCommand::Connect).await.unwrap();
    sleep(Duration::from_secs(2)).await;
    assert!(probe.packets().is_empty());
    assert!(probe.is_connected());

    drop(tx);
    let scheduler = task.await.unwrap();
    assert_eq!(scheduler.state(), SessionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn settings_change_while_running() {
    let h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    let probe = h.probe.clone();
    let panel = h.panel.clone();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(CycleRunner::new(h.scheduler, h.panel, ModeKind::Periodic, rx).run());

    tx.send(OperatorCommand::Connect).await.unwrap();
    tx.send(OperatorCommand::Toggle).await.unwrap();
    sleep(Duration::from_millis(450)).await;
    tx.send(OperatorCommand::Set(PeriodicField::BaseSpeed, 70))
        .await
        .unwrap();
    sleep(Duration::from_millis(200)).await;

    assert_eq!(panel.periodic_config().base_speed, 70);
    assert_eq!(probe.values(), vec![50, 50, 70, 70]);

    tx.send(OperatorCommand::Quit).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn randomizer_runs_at_its_own_cadence() {
    let h = Harness::new(periodic(0, 0, 10, 0), SystemRandom::seeded(9));
    let probe = h.probe.clone();
    let panel = h.panel.clone();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(CycleRunner::new(h.scheduler, h.panel, ModeKind::Randomizer, rx).run());

    tx.send(OperatorCommand::Connect).await.unwrap();
    tx.send(OperatorCommand::Toggle).await.unwrap();
    // connected at 200 ms, ticks at 700, 1200, 1700 ms
    sleep(Duration::from_millis(2_100)).await;
    assert_eq!(probe.packets().len(), 3);

    // settings belong to the periodic variant
    tx.send(OperatorCommand::Set(PeriodicField::BaseSpeed, 70))
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(panel.status().severity, Severity::Warning);
    assert_eq!(panel.periodic_config().base_speed, 0);

    tx.send(OperatorCommand::Quit).await.unwrap();
    let scheduler = task.await.unwrap();
    assert_eq!(scheduler.state(), SessionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn rejected_command_is_shown_and_loop_survives() {
    let h = Harness::new(periodic(50, 0, 10, 0), ScriptedRandom::new());
    let panel = h.panel.clone();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(CycleRunner::new(h.scheduler, h.panel, ModeKind::Periodic, rx).run());

    tx.send(OperatorCommand::Start).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    let status = panel.status();
    assert_eq!(status.severity, Severity::Warning);
    assert!(status.text.starts_with("start rejected"));

    tx.send(OperatorCommand::Connect).await.unwrap();
    sleep(Duration::from_millis(300)).await;
    assert_eq!(panel.status().text, "Connected");

    tx.send(OperatorCommand::Quit).await.unwrap();
    task.await.unwrap();
}
