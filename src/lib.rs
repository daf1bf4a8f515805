//! # navien-rs - A Rust Crate for the Navien RS-485 Protocol
//!
//! The navien-rs crate decodes and drives the proprietary RS-485 serial
//! protocol Navien tankless water heaters and combi boilers use to talk
//! to their wall controllers and NaviLink-class monitoring adapters.
//!
//! ## Features
//!
//! - Frame the unreliable, shared, half-duplex byte stream into
//!   checksum-validated packets
//! - Decode water-side and gas/controller-side telemetry into typed
//!   fields (temperatures, flow, gas usage, firmware versions, status
//!   bits)
//! - Queue control commands (power, HotButton recirculation, scheduled
//!   recirculation, DHW set temperature) and arbitrate their
//!   transmission against a possibly competing controller on the bus
//! - Route decoded packets to per-source visitors in multi-unit cascade
//!   installations
//! - Connect to the bus through a serial port, or drive the engine from
//!   any byte source via the [`NavienUart`] trait
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the navien-rs crate in your Rust project, add the following to
//! your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! navien-rs = "0.1.0"
//! ```
//!
//! Then, in your Rust code, you can import the necessary modules and
//! functions:
//!
//! ```rust
//! use navien_rs::{
//!     connect, init_logger, GasStatus, NavienError, NavienLink,
//!     NavienVisitor, WaterStatus,
//! };
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod navien;
pub mod util;

pub use crate::error::NavienError;
pub use crate::logging::{init_logger, log_info};

// Core protocol types
pub use navien::decode::{
    GasStatus, GasSystemStatus, HeatingMode, Payload, RecircStatus, WaterStatus, WaterSystemStatus,
};
pub use navien::frame::{Header, RawPacket};
pub use navien::protocol::{LinkStats, NavienLink, NavienVisitor};
pub use navien::serial::{NavienDeviceHandle, SerialConfig};
pub use navien::uart::{NavienUart, UartBuffer};

/// Connect to a Navien bus via serial port.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
///
/// # Returns
/// * `Ok(NavienDeviceHandle)` - Connected handle for communication
/// * `Err(NavienError)` - Connection failed
pub async fn connect(port: &str) -> Result<NavienDeviceHandle, NavienError> {
    NavienDeviceHandle::connect(port).await
}

/// Disconnect from the Navien bus.
///
/// # Arguments
/// * `handle` - Device handle to disconnect
pub async fn disconnect(handle: &mut NavienDeviceHandle) -> Result<(), NavienError> {
    handle.disconnect().await
}
