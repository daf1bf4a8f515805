//! # Utility Modules
//!
//! Common helpers used throughout the navien-rs crate: hex
//! encoding/formatting for frame dumps and rate-limited logging.

pub mod hex;
pub mod logging;

pub use hex::{encode_hex, pretty_hex};
pub use logging::{log_frame_hex, LogThrottle};
