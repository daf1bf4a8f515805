//! The navien module contains the components responsible for the core
//! protocol implementation: checksum, frame model, payload decoding, the
//! poll-driven protocol engine and serial communication.

pub mod checksum;
pub mod decode;
pub mod frame;
pub mod protocol;
pub mod serial;
pub mod uart;

pub use decode::{GasStatus, HeatingMode, Payload, WaterStatus};
pub use frame::{Header, RawPacket};
pub use protocol::{LinkStats, NavienLink, NavienVisitor};
pub use serial::{NavienDeviceHandle, SerialConfig};
pub use uart::{NavienUart, UartBuffer};
