//! Actuator command types and the 3-byte wire codec.
//!
//! Every command sent to the actuator is `[0x01, 0x01, V]` where
//! `V ∈ [0, 100] ∪ [128, 228]`:
//!
//! | Direction | V |
//! |-----------|---|
//! | Forward   | `speed` |
//! | Reverse   | `0x80 + speed` |
//! | any, speed 0 | `0x00` (stop code) |

use crate::consts::{MAX_SPEED, PACKET_HEADER, PACKET_LEN, REVERSE_OFFSET, STOP_CODE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rotation direction of the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Direction {
    /// Clockwise rotation.
    #[default]
    Forward = 0,
    /// Counter-clockwise rotation.
    Reverse = 1,
    /// Not rotating.
    Stopped = 2,
}

impl Direction {
    /// Opposite rotation. `Stopped` resumes as `Forward`.
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse | Self::Stopped => Self::Forward,
        }
    }

    /// Short operator-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Forward => "FWD",
            Self::Reverse => "REV",
            Self::Stopped => "STOP",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (speed, direction) decision produced by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CommandState {
    /// Speed in percent, `0..=100`.
    pub speed: u8,
    /// Rotation direction.
    pub direction: Direction,
}

impl CommandState {
    /// The stop command.
    pub const STOP: Self = Self {
        speed: 0,
        direction: Direction::Stopped,
    };

    /// Create a command.
    #[inline]
    pub const fn new(speed: u8, direction: Direction) -> Self {
        Self { speed, direction }
    }

    /// True when this command halts the actuator.
    #[inline]
    pub const fn is_stop(&self) -> bool {
        self.speed == 0 || matches!(self.direction, Direction::Stopped)
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] speed:{:3}", self.direction, self.speed)
    }
}

/// Errors from decoding a received packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Packet is not exactly three bytes long.
    #[error("Invalid packet length: {0} (expected 3)")]
    InvalidLength(usize),

    /// Header bytes differ from `[0x01, 0x01]`.
    #[error("Invalid packet header: {0:#04x} {1:#04x}")]
    InvalidHeader(u8, u8),

    /// Value byte outside both speed bands.
    #[error("Invalid command value: {0:#04x}")]
    InvalidValue(u8),
}

/// A 3-byte actuator command packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandPacket([u8; PACKET_LEN]);

impl CommandPacket {
    /// The universal stop packet.
    pub const STOP: Self = Self([PACKET_HEADER[0], PACKET_HEADER[1], STOP_CODE]);

    /// Encode a command. See [`encode`].
    #[inline]
    pub fn encode(command: CommandState) -> Self {
        Self(encode(command.speed, command.direction))
    }

    /// Raw bytes as written to the characteristic.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }

    /// The value byte `V`.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0[2]
    }

    /// True when this is the stop code.
    #[inline]
    pub const fn is_stop(&self) -> bool {
        self.0[2] == STOP_CODE
    }

    /// Decode a received packet back into a command.
    ///
    /// `0x00` and the bare reverse offset `0x80` both decode as a stop.
    pub fn decode(bytes: &[u8]) -> Result<CommandState, PacketError> {
        let &[h0, h1, value] = bytes else {
            return Err(PacketError::InvalidLength(bytes.len()));
        };
        if [h0, h1] != PACKET_HEADER {
            return Err(PacketError::InvalidHeader(h0, h1));
        }

        match value {
            STOP_CODE => Ok(CommandState::STOP),
            v if v <= MAX_SPEED => Ok(CommandState::new(v, Direction::Forward)),
            REVERSE_OFFSET => Ok(CommandState::STOP),
            v if v > REVERSE_OFFSET && v - REVERSE_OFFSET <= MAX_SPEED => {
                Ok(CommandState::new(v - REVERSE_OFFSET, Direction::Reverse))
            }
            v => Err(PacketError::InvalidValue(v)),
        }
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X} {:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Encode `(speed, direction)` into the 3-byte wire packet.
///
/// Callers clamp `speed` to `0..=100`; anything above saturates at 100 so
/// the value byte always stays inside its band. A zero speed (or `Stopped`)
/// always yields the stop code.
pub fn encode(speed: u8, direction: Direction) -> [u8; PACKET_LEN] {
    let speed = speed.min(MAX_SPEED);
    let value = match direction {
        _ if speed == 0 => STOP_CODE,
        Direction::Forward => speed,
        Direction::Reverse => REVERSE_OFFSET + speed,
        Direction::Stopped => STOP_CODE,
    };
    [PACKET_HEADER[0], PACKET_HEADER[1], value]
}
