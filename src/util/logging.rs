//! # Logging Utilities
//!
//! Rate-limited logging for the receive path. A noisy or mis-terminated
//! bus can produce a checksum error on every frame; the throttle keeps
//! that from flooding the log while still surfacing the condition.

use std::time::Instant;

use log::{debug, log_enabled, Level};

use crate::util::hex::pretty_hex;

/// Throttling structure for rate-limiting log messages.
#[derive(Debug)]
pub struct LogThrottle {
    /// Time window for throttling (in milliseconds)
    window_ms: u64,
    /// Maximum messages allowed per window
    cap: u32,
    /// Current message count in window
    count: u32,
    /// Start time of current window
    t0: Instant,
}

impl LogThrottle {
    /// Create a new throttle allowing `cap` messages per `window_ms`.
    pub fn new(window_ms: u64, cap: u32) -> Self {
        Self {
            window_ms,
            cap,
            count: 0,
            t0: Instant::now(),
        }
    }

    /// Check if logging is allowed (resets counter after window expires).
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.t0).as_millis() as u64;

        if elapsed_ms > self.window_ms {
            self.t0 = now;
            self.count = 0;
        }

        self.count += 1;
        self.count <= self.cap
    }

    /// Start a new window immediately.
    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
    }
}

/// Log a frame as a hex dump at debug level.
pub fn log_frame_hex(label: &str, data: &[u8]) {
    if log_enabled!(Level::Debug) {
        debug!("{label}: {}", pretty_hex(data));
    }
}
