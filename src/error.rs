//! # Navien Error Handling
//!
//! This module defines the NavienError enum, which represents the different
//! error types that can occur in the navien-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the Navien crate.
#[derive(Debug, Error)]
pub enum NavienError {
    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// Indicates an error when parsing a Navien frame.
    #[error("Error parsing Navien frame: {0}")]
    FrameParseError(String),

    /// Indicates a checksum mismatch.
    #[error("Invalid checksum: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    InvalidChecksum { expected: u8, calculated: u8 },

    /// Indicates a header length field that does not fit the receive buffer.
    #[error("Frame too large: length field {length}")]
    FrameTooLarge { length: u8 },

    /// A catch-all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}
