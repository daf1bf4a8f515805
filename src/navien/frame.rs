//! # Navien Frame Model
//!
//! Fixed-layout header and raw frame buffer for the Navien RS-485
//! protocol. A frame on the wire is a 6-byte header, `length` payload
//! bytes and one trailing checksum byte. [`RawPacket`] doubles as the
//! engine's receive buffer; instances are transient and overwritten on
//! every receive cycle.

use crate::constants::{
    CONTROL_PREFIX_LEN, HDR_SIZE, MAX_PACKET_SIZE, NAVILINK_PRESENT, PACKET_MARKER,
};
use crate::error::NavienError;
use crate::navien::checksum::checksum;
use crate::navien::uart::NavienUart;

/// Parsed view of the 6-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Frame marker, always [`PACKET_MARKER`].
    pub marker: u8,
    /// System type identifier; `0x05` on every unit observed so far.
    pub sys_type: u8,
    /// Source address of the frame.
    pub src: u8,
    /// Destination address; selects the payload interpretation for status
    /// frames.
    pub dst: u8,
    /// Direction byte: status (device to controller) or control
    /// (controller to device).
    pub direction: u8,
    /// Count of payload bytes that follow the header, excluding the
    /// trailing checksum byte.
    pub len: u8,
}

impl Header {
    /// Build a header from its wire representation.
    pub fn from_bytes(bytes: &[u8; HDR_SIZE]) -> Header {
        Header {
            marker: bytes[0],
            sys_type: bytes[1],
            src: bytes[2],
            dst: bytes[3],
            direction: bytes[4],
            len: bytes[5],
        }
    }

    /// Number of bytes that follow the header on the wire: the payload
    /// plus the trailing checksum byte.
    pub fn body_len(&self) -> usize {
        self.len as usize + 1
    }

    /// Whether a frame of this advertised length fits the receive buffer.
    pub fn fits_buffer(&self) -> bool {
        HDR_SIZE + self.body_len() <= MAX_PACKET_SIZE
    }

    pub fn is_marker(&self) -> bool {
        self.marker == PACKET_MARKER
    }
}

/// One complete frame as received off the wire: header, payload and
/// trailing checksum byte in a fixed 128-byte buffer.
#[derive(Debug, Clone)]
pub struct RawPacket {
    buf: [u8; MAX_PACKET_SIZE],
    len: usize,
}

impl Default for RawPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl RawPacket {
    pub fn new() -> Self {
        RawPacket {
            buf: [0u8; MAX_PACKET_SIZE],
            len: 0,
        }
    }

    /// Consume exactly one header from the byte source into the buffer.
    /// Returns false if the source failed to deliver the bytes.
    pub fn read_header<U: NavienUart>(&mut self, uart: &mut U) -> bool {
        if uart.read_array(&mut self.buf[..HDR_SIZE]) {
            self.len = HDR_SIZE;
            true
        } else {
            false
        }
    }

    /// Consume the payload and checksum byte announced by the header.
    /// Must only be called after a successful [`read_header`].
    ///
    /// [`read_header`]: RawPacket::read_header
    pub fn read_body<U: NavienUart>(&mut self, uart: &mut U) -> bool {
        let total = HDR_SIZE + self.header().body_len();
        if total > MAX_PACKET_SIZE {
            return false;
        }
        if uart.read_array(&mut self.buf[HDR_SIZE..total]) {
            self.len = total;
            true
        } else {
            false
        }
    }

    /// Parsed header view of the buffered bytes.
    pub fn header(&self) -> Header {
        let mut hdr = [0u8; HDR_SIZE];
        hdr.copy_from_slice(&self.buf[..HDR_SIZE]);
        Header::from_bytes(&hdr)
    }

    /// The complete frame, including header and checksum byte.
    pub fn frame(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The payload bytes between header and checksum byte.
    pub fn payload(&self) -> &[u8] {
        &self.buf[HDR_SIZE..self.len.saturating_sub(1)]
    }

    /// The received checksum, always the last byte of the frame.
    pub fn checksum_byte(&self) -> u8 {
        self.buf[self.len.saturating_sub(1)]
    }

    /// Validate the received checksum under the given seed.
    pub fn verify(&self, seed: u16) -> Result<(), NavienError> {
        let calculated = checksum(&self.buf[..self.len - 1], seed);
        let expected = self.checksum_byte();
        if calculated == expected {
            Ok(())
        } else {
            Err(NavienError::InvalidChecksum {
                expected,
                calculated,
            })
        }
    }

    /// Whether this frame is a presence announcement from a NaviLink-class
    /// controller.
    pub fn is_presence_frame(&self) -> bool {
        self.header().len == NAVILINK_PRESENT[5] && self.frame() == &NAVILINK_PRESENT[..]
    }

    /// Whether this frame carries the header prefix every NaviLink control
    /// frame starts with. Used by the arbiter to spot the competing
    /// controller's transmissions.
    pub fn has_control_prefix(&self) -> bool {
        self.frame().starts_with(&NAVILINK_PRESENT[..CONTROL_PREFIX_LEN])
    }
}
