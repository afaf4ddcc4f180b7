//! System-wide constants for the Cyclone workspace.
//!
//! Single source of truth for the wire format, value ranges, device identity
//! and default cadences. Imported by all crates.

// ─── Device identity ────────────────────────────────────────────────

/// Radio address of the actuator.
pub const DEVICE_ADDRESS: &str = "E2:4D:31:4C:FE:26";

/// GATT characteristic that accepts command packets.
pub const WRITE_CHARACTERISTIC_UUID: &str = "40ee2222-63ec-4b7f-8ce7-712efd55b90e";

// ─── Wire format ────────────────────────────────────────────────────

/// Fixed two-byte header of every command packet.
pub const PACKET_HEADER: [u8; 2] = [0x01, 0x01];

/// Length of a command packet in bytes.
pub const PACKET_LEN: usize = 3;

/// Value byte that stops the actuator.
pub const STOP_CODE: u8 = 0x00;

/// Offset added to the speed when rotating in reverse.
pub const REVERSE_OFFSET: u8 = 0x80;

// ─── Value ranges ───────────────────────────────────────────────────

/// Maximum commanded speed.
pub const MAX_SPEED: u8 = 100;

/// Maximum speed jitter magnitude (±).
pub const MAX_SPEED_JITTER: u8 = 50;

/// Minimum reversal period in ticks.
pub const MIN_PERIOD_STEPS: u32 = 1;

/// Maximum reversal period in ticks.
pub const MAX_PERIOD_STEPS: u32 = 200;

/// Maximum reversal period jitter magnitude (± ticks).
pub const MAX_PERIOD_JITTER: u32 = 100;

// ─── Defaults ───────────────────────────────────────────────────────

/// Default reversal period in ticks.
pub const DEFAULT_BASE_PERIOD_STEPS: u32 = 10;

/// Periodic oscillator tick interval (100 ms).
pub const PERIODIC_TICK_MS: u64 = 100;

/// Autonomous randomizer tick interval (500 ms).
pub const RANDOMIZER_TICK_MS: u64 = 500;

/// Device discovery timeout (5 s).
pub const DISCOVERY_TIMEOUT_MS: u64 = 5_000;

/// Upper bound on a single command write.
pub const SEND_TIMEOUT_MS: u64 = 1_000;

/// Console panel refresh interval.
pub const PANEL_REFRESH_MS: u64 = 50;

/// Default transport driver name.
pub const DEFAULT_DRIVER: &str = "simulation";

/// Default service name used in log output.
pub const DEFAULT_SERVICE_NAME: &str = "cyclone";
