//! Operator console command parser.
//!
//! One command per line. A blank line toggles the running mode, matching the
//! single start/stop button of the panel.

use cyclone_common::types::PeriodicField;
use std::str::FromStr;
use thiserror::Error;

/// Command text shown by `help`.
pub const HELP: &str = "\
commands:
  connect | c          connect to the actuator
  disconnect | d       stop and disconnect
  <enter> | toggle | t start/stop the mode
  start | stop         start or stop the mode
  speed N              base speed (0-100)
  jitter N             speed jitter (0-50)
  period N             ticks between reversals (1-200)
  pjitter N            reversal period jitter (0-100)
  status               show session and settings
  help | h | ?         this text
  quit | q             stop, disconnect and exit";

/// A parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Open the session.
    Connect,
    /// Close the session.
    Disconnect,
    /// Start the mode if idle, stop it if running.
    Toggle,
    /// Start the mode.
    Start,
    /// Stop the mode.
    Stop,
    /// Adjust a periodic setting.
    Set(PeriodicField, u32),
    /// Print session and settings.
    Status,
    /// Print command help.
    Help,
    /// Stop, disconnect and exit.
    Quit,
}

/// Console input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Unrecognized command word.
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    /// Setting command without a value.
    #[error("'{0}' needs a value")]
    MissingValue(&'static str),

    /// Value is not a non-negative integer.
    #[error("invalid value '{value}' for '{command}'")]
    InvalidValue {
        /// Command word.
        command: &'static str,
        /// Offending text.
        value: String,
    },

    /// Extra words after a complete command.
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

impl FromStr for OperatorCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Self::Toggle);
        };
        let lowered = word.to_ascii_lowercase();

        let field = match lowered.as_str() {
            "speed" => Some(("speed", PeriodicField::BaseSpeed)),
            "jitter" => Some(("jitter", PeriodicField::SpeedJitter)),
            "period" => Some(("period", PeriodicField::BasePeriodSteps)),
            "pjitter" => Some(("pjitter", PeriodicField::PeriodJitter)),
            _ => None,
        };

        let command = if let Some((name, field)) = field {
            let raw = words.next().ok_or(InputError::MissingValue(name))?;
            let value = raw.parse::<u32>().map_err(|_| InputError::InvalidValue {
                command: name,
                value: raw.to_string(),
            })?;
            Self::Set(field, value)
        } else {
            match lowered.as_str() {
                "connect" | "c" => Self::Connect,
                "disconnect" | "d" => Self::Disconnect,
                "toggle" | "t" => Self::Toggle,
                "start" => Self::Start,
                "stop" => Self::Stop,
                "status" | "s" => Self::Status,
                "help" | "h" | "?" => Self::Help,
                "quit" | "q" | "exit" => Self::Quit,
                _ => return Err(InputError::Unknown(word.to_string())),
            }
        };

        match words.next() {
            Some(extra) => Err(InputError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}
