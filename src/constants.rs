//! Navien Protocol Constants
//!
//! This module defines the wire-format constants of the Navien RS-485
//! protocol: header field values, checksum seeds, status register bit
//! masks and the literal command frames. All values were recovered from
//! RS-485 traces and must match the device firmware bit-for-bit.

/// Sentinel byte that begins every frame; used for stream resynchronization.
pub const PACKET_MARKER: u8 = 0xF7;

/// Header size in bytes (marker, system type, source, destination,
/// direction, length).
pub const HDR_SIZE: usize = 6;

/// Maximum total frame size (header + payload + checksum).
pub const MAX_PACKET_SIZE: usize = 128;

/// Source address of control frames originated by a NaviLink-class device.
pub const PACKET_SRC_CONTROL: u8 = 0x0F;

/// Base source address of status frames originated by the heater itself.
/// In cascade installations additional units report from `0x51`, `0x52`, ...
pub const PACKET_SRC_STATUS: u8 = 0x50;

/// Destination of water-side telemetry (flow and temperature data).
pub const PACKET_DST_WATER: u8 = 0x50;

/// Destination of gas/controller-side telemetry.
pub const PACKET_DST_GAS: u8 = 0x0F;

/// Direction byte of status frames (heater to control device).
pub const PACKET_DIR_STATUS: u8 = 0x90;

/// Direction byte of control frames (control device to heater).
pub const PACKET_DIR_CONTROL: u8 = 0x10;

/// Checksum seed for status frames sourced from [`PACKET_SRC_STATUS`].
pub const CHECKSUM_SEED_STATUS: u16 = 0x4B;

/// Checksum seed for every other frame, including outbound control frames.
pub const CHECKSUM_SEED_CONTROL: u16 = 0x62;

/// Number of visitor slots for cascade installations.
pub const CASCADE_MAX: usize = 16;

// ----------------------------------------------------------------------------
// Water status register bits (payload `system_status` byte)
// ----------------------------------------------------------------------------

/// Power on/off bit of the `system_power` byte.
pub const POWER_STATUS_ON_OFF_MASK: u8 = 0x01;

/// Internal scheduled recirculation mode. When either scheduled bit is set
/// the unit cedes recirculation timing to a NaviLink-class device.
pub const SYS_STATUS_FLAG_RECIRC_INT_SCHEDULED: u8 = 0x01;

/// External scheduled recirculation mode.
pub const SYS_STATUS_FLAG_RECIRC_EXT_SCHEDULED: u8 = 0x02;

/// Front-panel display units: set means Celsius. Reported values are always
/// metric regardless of this bit.
pub const SYS_STATUS_FLAG_UNITS: u8 = 0x08;

// ----------------------------------------------------------------------------
// Water recirculation-enabled register bits (payload `recirculation_enabled`)
// ----------------------------------------------------------------------------

/// HotButton recirculation has been triggered and is active.
pub const RECIRC_STATUS_FLAG_HOTBUTTON_ON: u8 = 0x01;

/// Scheduled-mode recirculation is allowed.
pub const RECIRC_STATUS_FLAG_SCHEDULED_ON: u8 = 0x02;

// ----------------------------------------------------------------------------
// Gas secondary status register bits (payload `system_status_2` byte)
// ----------------------------------------------------------------------------

/// Display units: set means imperial (Fahrenheit), clear means metric.
pub const SYS_STATUS_2_DISPLAY_UNITS: u8 = 0x01;

/// HotButton recirculation mode is enabled on the unit.
pub const SYS_STATUS_2_HOTBUTTON_ENABLED: u8 = 0x04;

// ----------------------------------------------------------------------------
// Command frames
//
// Most commands carry no variable data, so the full frame including the
// trailing checksum is precomputed. The set-temperature command is the one
// template: its temperature byte and checksum are filled in at send time.
// ----------------------------------------------------------------------------

/// Turn the unit off.
pub const TURN_OFF_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x0B, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x0A,
];

/// Turn the unit on.
pub const TURN_ON_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xCE,
];

/// HotButton press (demand recirculation). Always followed by
/// [`HOT_BUTTON_RELEASE_CMD`].
pub const HOT_BUTTON_PRESS_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x6A,
];

/// HotButton release.
pub const HOT_BUTTON_RELEASE_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x2A,
];

/// Enable recirculation while in scheduled mode. The unit runs a cycle
/// immediately and keeps cycling on its internal logic until it receives
/// [`SCHEDULED_RECIRC_OFF_CMD`].
pub const SCHEDULED_RECIRC_ON_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xEE,
];

/// Disable recirculation while in scheduled mode.
pub const SCHEDULED_RECIRC_OFF_CMD: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xC0,
];

/// Template for the set-DHW-temperature command. The byte at
/// [`SET_TEMP_BYTE_OFFSET`] is overwritten with `round(celsius * 2)` and the
/// final byte with a checksum computed under [`CHECKSUM_SEED_CONTROL`].
pub const SET_TEMP_CMD_TEMPLATE: [u8; 19] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x0C, 0x4F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Offset of the temperature byte within [`SET_TEMP_CMD_TEMPLATE`].
pub const SET_TEMP_BYTE_OFFSET: usize = 9;

/// Presence announcement. Sent after each received frame while the bus is
/// otherwise idle so that a unit in scheduled recirculation mode treats this
/// engine as the recirculation-timing authority. Receiving this exact frame
/// from someone else is proof of a competing controller on the bus.
pub const NAVILINK_PRESENT: [u8; 10] = [
    PACKET_MARKER, 0x05, 0x0F, 0x50, 0x10, 0x03, 0x4A, 0x00, 0x01, 0x55,
];

/// Length of the frame prefix (marker through direction) shared by every
/// control frame; used by the arbiter to recognize the competing
/// controller's transmissions.
pub const CONTROL_PREFIX_LEN: usize = 5;
