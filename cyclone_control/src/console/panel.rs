//! Terminal panel implementing `Presenter`.
//!
//! The scheduler pushes into the panel; the refresh task pulls a `Frame` at
//! its own cadence and only when something changed.

use crate::presentation::{ControlsView, Presenter, Severity, StatusUpdate, Telemetry};
use cyclone_common::types::{PeriodicConfig, PeriodicField};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;

/// Status lines kept for inspection.
const HISTORY_LEN: usize = 64;

/// Changes since the previous frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// New status line, if it changed.
    pub status: Option<StatusUpdate>,
    /// New telemetry line, if it changed.
    pub telemetry: Option<String>,
}

impl Frame {
    /// Terminal text. Status lines scroll; telemetry rewrites the current line.
    pub fn render(&self, colour: bool) -> String {
        let mut out = String::new();
        if let Some(status) = &self.status {
            out.push_str("\r\x1b[2K");
            if colour {
                out.push_str(&format!(
                    "\x1b[{}m● {}\x1b[0m\n",
                    status.severity.ansi(),
                    status.text
                ));
            } else {
                out.push_str(&format!("[{}] {}\n", status.severity.colour(), status.text));
            }
        }
        if let Some(line) = &self.telemetry {
            out.push_str("\r\x1b[2K");
            out.push_str(line);
        }
        out
    }
}

#[derive(Debug)]
struct View {
    status: StatusUpdate,
    history: VecDeque<StatusUpdate>,
    controls: ControlsView,
    telemetry: Option<Telemetry>,
    status_dirty: bool,
    telemetry_dirty: bool,
}

/// Console presentation surface.
#[derive(Debug)]
pub struct ConsolePanel {
    config: RwLock<PeriodicConfig>,
    view: Mutex<View>,
}

impl ConsolePanel {
    /// Panel seeded with the initial periodic settings.
    pub fn new(initial: PeriodicConfig) -> Self {
        Self {
            config: RwLock::new(initial.clamped()),
            view: Mutex::new(View {
                status: StatusUpdate::new("Not connected", Severity::Error),
                history: VecDeque::with_capacity(HISTORY_LEN),
                controls: ControlsView::default(),
                telemetry: None,
                status_dirty: true,
                telemetry_dirty: false,
            }),
        }
    }

    /// Apply an operator edit (clamped) and return the resulting settings.
    pub fn set_field(&self, field: PeriodicField, value: u32) -> PeriodicConfig {
        let mut config = self.config.write();
        config.apply(field, value);
        *config
    }

    /// Current status line.
    pub fn status(&self) -> StatusUpdate {
        self.view.lock().status.clone()
    }

    /// Recent status lines, oldest first.
    pub fn history(&self) -> Vec<StatusUpdate> {
        self.view.lock().history.iter().cloned().collect()
    }

    /// Current control availability.
    pub fn controls(&self) -> ControlsView {
        self.view.lock().controls
    }

    /// Latest telemetry.
    pub fn telemetry(&self) -> Option<Telemetry> {
        self.view.lock().telemetry.clone()
    }

    /// Take what changed since the last call; `None` when nothing did.
    pub fn take_frame(&self) -> Option<Frame> {
        let mut view = self.view.lock();
        if !view.status_dirty && !view.telemetry_dirty {
            return None;
        }
        let frame = Frame {
            status: view.status_dirty.then(|| view.status.clone()),
            telemetry: view
                .telemetry
                .as_ref()
                .filter(|_| view.telemetry_dirty)
                .map(ToString::to_string),
        };
        view.status_dirty = false;
        view.telemetry_dirty = false;
        Some(frame)
    }
}

impl Presenter for ConsolePanel {
    fn periodic_config(&self) -> PeriodicConfig {
        *self.config.read()
    }

    fn show_status(&self, update: StatusUpdate) {
        let mut view = self.view.lock();
        if view.history.len() == HISTORY_LEN {
            view.history.pop_front();
        }
        view.history.push_back(update.clone());
        view.status = update;
        view.status_dirty = true;
    }

    fn show_controls(&self, controls: ControlsView) {
        self.view.lock().controls = controls;
    }

    fn show_telemetry(&self, telemetry: Telemetry) {
        let mut view = self.view.lock();
        view.telemetry = Some(telemetry);
        view.telemetry_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyclone_common::command::{CommandState, Direction};

    #[test]
    fn edits_are_clamped() {
        let panel = ConsolePanel::new(PeriodicConfig::default());
        let cfg = panel.set_field(PeriodicField::BaseSpeed, 250);
        assert_eq!(cfg.base_speed, 100);
        let cfg = panel.set_field(PeriodicField::BasePeriodSteps, 0);
        assert_eq!(cfg.base_period_steps, 1);
        assert_eq!(panel.periodic_config(), cfg);
    }

    #[test]
    fn frames_only_when_dirty() {
        let panel = ConsolePanel::new(PeriodicConfig::default());
        let first = panel.take_frame().unwrap();
        assert_eq!(first.status.unwrap().text, "Not connected");
        assert!(panel.take_frame().is_none());

        panel.show_telemetry(Telemetry {
            command: CommandState::new(10, Direction::Reverse),
            steps_until_reversal: None,
            send_error: None,
        });
        let frame = panel.take_frame().unwrap();
        assert!(frame.status.is_none());
        assert_eq!(frame.telemetry.as_deref(), Some("[REV] speed: 10"));
    }

    #[test]
    fn history_is_bounded() {
        let panel = ConsolePanel::new(PeriodicConfig::default());
        for i in 0..(HISTORY_LEN + 5) {
            panel.show_status(StatusUpdate::new(format!("line {i}"), Severity::Info));
        }
        let history = panel.history();
        assert_eq!(history.len(), HISTORY_LEN);
        assert_eq!(history[0].text, "line 5");
        assert_eq!(panel.status().text, format!("line {}", HISTORY_LEN + 4));
    }

    #[test]
    fn render_plain() {
        let frame = Frame {
            status: Some(StatusUpdate::new("Connected", Severity::Success)),
            telemetry: Some("[FWD] speed: 50".to_string()),
        };
        assert_eq!(
            frame.render(false),
            "\r\x1b[2K[green] Connected\n\r\x1b[2K[FWD] speed: 50"
        );
    }
}
