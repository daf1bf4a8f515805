//! # Navien Protocol Engine
//!
//! [`NavienLink`] turns the shared, half-duplex RS-485 byte stream into
//! validated, typed packets and safely injects outbound command frames
//! onto a bus that may already have a legitimate controller transmitting
//! on it.
//!
//! The engine is single-threaded, cooperative and poll-driven: it owns no
//! timers, does no blocking I/O, and is driven by calling
//! [`receive`](NavienLink::receive) from the host's polling tick. When too
//! few bytes are buffered to make progress it suspends mid-state and
//! resumes on the next tick. Decoded packets are routed to per-source
//! visitor slots so cascade installations can register one target per
//! unit.
//!
//! If a host delivers receive ticks and command calls from different
//! threads it must serialize access itself.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use log::{debug, error, trace, warn};
use serde::Serialize;

use crate::constants::{
    CASCADE_MAX, CHECKSUM_SEED_CONTROL, HDR_SIZE, HOT_BUTTON_PRESS_CMD, HOT_BUTTON_RELEASE_CMD,
    NAVILINK_PRESENT, PACKET_DIR_CONTROL, PACKET_DIR_STATUS, PACKET_MARKER, PACKET_SRC_CONTROL,
    PACKET_SRC_STATUS, SCHEDULED_RECIRC_OFF_CMD, SCHEDULED_RECIRC_ON_CMD, SET_TEMP_BYTE_OFFSET,
    SET_TEMP_CMD_TEMPLATE, TURN_OFF_CMD, TURN_ON_CMD,
};
use crate::error::NavienError;
use crate::navien::checksum::{checksum, seed_for_source};
use crate::navien::decode::{decode, GasStatus, Payload, WaterStatus};
use crate::navien::frame::RawPacket;
use crate::navien::uart::NavienUart;
use crate::util::logging::{log_frame_hex, LogThrottle};

/// Callback interface for decoded packets, invoked by the engine as
/// frames arrive. One visitor is registered per cascade slot; the source
/// address of the originating unit accompanies every data callback.
pub trait NavienVisitor {
    /// A validated water telemetry frame was decoded.
    fn on_water(&mut self, water: &WaterStatus, src: u8);

    /// A validated gas/controller telemetry frame was decoded.
    fn on_gas(&mut self, gas: &GasStatus, src: u8);

    /// The host determined communication with the bus was lost.
    fn on_error(&mut self);
}

/// Receive state machine position. Each state suspends independently when
/// the byte source runs dry and resumes on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Scanning for the frame marker; garbage bytes are discarded.
    Initial,
    /// Marker seen; waiting for a complete header.
    MarkerFound,
    /// Header buffered; waiting for payload plus checksum byte.
    HeaderParsed,
}

/// Counters over the engine's lifetime. Consumers watch
/// `frames_received`/`frames_decoded` across their own polling interval
/// to make the connectivity-loss determination the engine itself does not.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct LinkStats {
    /// Complete frames pulled off the wire, valid or not.
    pub frames_received: u64,
    /// Frames that passed checksum validation and decoded to telemetry.
    pub frames_decoded: u64,
    pub checksum_errors: u64,
    /// Frames dropped for an unrecognized source, destination or shape.
    pub frames_ignored: u64,
    pub commands_sent: u64,
    pub presence_sent: u64,
}

/// The protocol engine: byte-stream framer, packet dispatcher, command
/// queue and bus arbiter in one poll-driven state machine.
///
/// Construct one per bus with [`NavienLink::new`] and hand it to every
/// consumer by reference; the engine holds all mutable protocol state.
pub struct NavienLink<U: NavienUart> {
    uart: U,

    // Framer state: survives across polls when a frame arrives fragmented.
    recv_state: ReadState,
    recv: RawPacket,

    // Queued outbound frames, oldest at the back.
    cmd_queue: VecDeque<Bytes>,

    /// Set once a presence frame not sent by us is observed; never
    /// cleared until restart.
    other_navilink_installed: bool,

    visitors: [Option<Box<dyn NavienVisitor>>; CASCADE_MAX],

    stats: LinkStats,
    crc_error_throttle: LogThrottle,
}

impl<U: NavienUart> NavienLink<U> {
    pub fn new(uart: U) -> Self {
        NavienLink {
            uart,
            recv_state: ReadState::Initial,
            recv: RawPacket::new(),
            cmd_queue: VecDeque::new(),
            other_navilink_installed: false,
            visitors: std::array::from_fn(|_| None),
            stats: LinkStats::default(),
            crc_error_throttle: LogThrottle::new(1000, 5),
        }
    }

    /// Register a visitor for one cascade slot (0-15). Slot `n` receives
    /// frames sourced from address `PACKET_SRC_STATUS + n`. Registering
    /// a slot twice replaces the earlier visitor.
    pub fn add_visitor(&mut self, visitor: Box<dyn NavienVisitor>, slot: usize) {
        if slot < CASCADE_MAX {
            self.visitors[slot] = Some(visitor);
        }
    }

    /// Read whatever bytes are buffered and interpret them as protocol
    /// frames, invoking visitors for each validated packet. Also the
    /// point at which queued commands and presence announcements are
    /// transmitted. Never blocks; returns as soon as no further progress
    /// can be made.
    pub fn receive(&mut self) {
        let mut available = self.uart.available();
        if available == 0 {
            return;
        }

        trace!("{available} bytes available");
        while available > 0 {
            match self.recv_state {
                ReadState::Initial => {
                    if !self.seek_to_marker() {
                        // No marker found and no data left. Wait for more
                        // bytes to come.
                        return;
                    }
                    trace!("marker found");
                    self.recv_state = ReadState::MarkerFound;
                    available = self.uart.available();
                }
                ReadState::MarkerFound => {
                    available = self.uart.available();
                    if available < HDR_SIZE {
                        trace!("only {available} bytes available - less than header size");
                        return;
                    }
                    if !self.recv.read_header(&mut self.uart) {
                        self.recv_state = ReadState::Initial;
                        continue;
                    }
                    let header = self.recv.header();
                    if !header.fits_buffer() {
                        warn!(
                            "dropping frame with oversized length field {}; resyncing",
                            header.len
                        );
                        self.stats.frames_ignored += 1;
                        self.recv_state = ReadState::Initial;
                        available = self.uart.available();
                        continue;
                    }
                    trace!("parsed header, {} bytes of body to read", header.len);
                    self.recv_state = ReadState::HeaderParsed;
                    // Fall through to the body read on this same pass if
                    // the bytes are already buffered.
                }
                ReadState::HeaderParsed => {
                    available = self.uart.available();
                    let body_len = self.recv.header().body_len();
                    if available < body_len {
                        trace!("only {available} data bytes available - less than {body_len}");
                        return;
                    }
                    if !self.recv.read_body(&mut self.uart) {
                        self.recv_state = ReadState::Initial;
                        continue;
                    }
                    trace!("got frame, {} bytes", self.recv.frame().len());
                    self.stats.frames_received += 1;

                    self.handle_frame();
                    // A completed inbound frame is the one safe window to
                    // put our own bytes on the half-duplex bus.
                    self.arbitrate();

                    available = self.uart.available();
                    self.recv_state = ReadState::Initial;
                }
            }
        }
    }

    /// Discard bytes until the next frame marker. Returns true when the
    /// marker is the next unconsumed byte.
    fn seek_to_marker(&mut self) -> bool {
        let available = self.uart.available();
        for _ in 0..available {
            match self.uart.peek_byte() {
                Some(PACKET_MARKER) => return true,
                Some(_) => {
                    self.uart.read_byte();
                }
                None => return false,
            }
        }
        false
    }

    /// Checksum-validate the buffered frame and route it.
    fn handle_frame(&mut self) {
        let header = self.recv.header();
        match header.direction {
            PACKET_DIR_STATUS => {
                if let Err(e) = self.recv.verify(seed_for_source(header.src)) {
                    self.note_checksum_error(header.src, e);
                    return;
                }
                self.dispatch_status();
            }
            PACKET_DIR_CONTROL => {
                // Cascade setups carry inter-unit control traffic with a
                // checksum scheme we have not identified; only frames from
                // the NaviLink control source are a recognized format.
                if header.src != PACKET_SRC_CONTROL {
                    debug!(
                        "control frame from SRC:0x{:02X} - not a recognized format",
                        header.src
                    );
                    self.stats.frames_ignored += 1;
                    return;
                }
                if let Err(e) = self.recv.verify(CHECKSUM_SEED_CONTROL) {
                    self.note_checksum_error(header.src, e);
                    return;
                }
                self.handle_control_frame();
            }
            _ => {
                self.stats.frames_ignored += 1;
            }
        }
    }

    fn note_checksum_error(&mut self, src: u8, err: NavienError) {
        self.stats.checksum_errors += 1;
        if self.crc_error_throttle.allow() {
            error!("SRC:0x{src:02X} {err}");
            log_frame_hex("rejected frame", self.recv.frame());
        }
    }

    /// Route a validated status frame to the visitor registered for its
    /// source. Decoding happens regardless of registration; a frame for
    /// an unregistered slot is dropped here without error.
    fn dispatch_status(&mut self) {
        let header = self.recv.header();
        match decode(&header, self.recv.payload()) {
            Payload::Water(water) => {
                self.stats.frames_decoded += 1;
                debug!("SRC:0x{:02X} => water", header.src);
                if let Some(visitor) = visitor_for(&mut self.visitors, header.src) {
                    visitor.on_water(&water, header.src);
                }
            }
            Payload::Gas(gas) => {
                self.stats.frames_decoded += 1;
                debug!("SRC:0x{:02X} => gas", header.src);
                if let Some(visitor) = visitor_for(&mut self.visitors, header.src) {
                    visitor.on_gas(&gas, header.src);
                }
            }
            Payload::Unrecognized => {
                self.stats.frames_ignored += 1;
            }
        }
    }

    /// Inspect a validated control frame. We never read our own writes
    /// back, so a presence announcement seen here proves a second,
    /// independent controller shares the bus. Detection is sticky for the
    /// life of the process: the correct re-arbitration policy is unknown,
    /// so once set the flag is never re-evaluated.
    fn handle_control_frame(&mut self) {
        trace!("got control frame, {} bytes", self.recv.frame().len());
        if !self.other_navilink_installed && self.recv.is_presence_frame() {
            warn!(
                "detected presence frame from another NaviLink device; \
                 suppressing our own presence frames until restart"
            );
            self.other_navilink_installed = true;
        }
    }

    /// One transmit opportunity, taken at each completed inbound frame.
    ///
    /// With no competing controller, a queued command goes out
    /// immediately, or a presence announcement if the queue is empty so
    /// the unit keeps treating us as its recirculation-timing authority.
    /// With a competing controller on the bus, presence announcements
    /// stop entirely and queued commands wait for a frame carrying the
    /// other controller's prefix, which narrows (without eliminating) the
    /// collision window on the half-duplex line.
    fn arbitrate(&mut self) {
        if self.cmd_queue.is_empty() {
            if !self.other_navilink_installed {
                self.uart.write_array(&NAVILINK_PRESENT);
                self.stats.presence_sent += 1;
            }
            return;
        }

        if !self.other_navilink_installed || self.recv.has_control_prefix() {
            if let Some(cmd) = self.cmd_queue.pop_back() {
                debug!("transmitting queued command, {} bytes", cmd.len());
                self.uart.write_array(&cmd);
                self.stats.commands_sent += 1;
            }
        }
    }

    /// Queue a command frame `tries` times. The unit has been observed to
    /// miss single transmissions, so commands repeat the way a real
    /// NaviLink repeats them. One queued frame is transmitted per
    /// completed inbound frame; there is no way to revoke a queued
    /// command.
    fn send_cmd(&mut self, cmd: Bytes, tries: usize) {
        for _ in 0..tries {
            self.cmd_queue.push_front(cmd.clone());
        }
    }

    pub fn send_turn_on_cmd(&mut self) {
        self.send_cmd(Bytes::from_static(&TURN_ON_CMD), 2);
    }

    pub fn send_turn_off_cmd(&mut self) {
        self.send_cmd(Bytes::from_static(&TURN_OFF_CMD), 2);
    }

    /// Press and release the HotButton (demand recirculation).
    pub fn send_hot_button_cmd(&mut self) {
        self.send_cmd(Bytes::from_static(&HOT_BUTTON_PRESS_CMD), 2);
        self.send_cmd(Bytes::from_static(&HOT_BUTTON_RELEASE_CMD), 1);
    }

    /// Set the domestic hot water target temperature. The command is the
    /// one parameterized frame: the temperature byte is written into the
    /// template as `round(celsius * 2)` and the checksum recomputed over
    /// the mutated buffer.
    pub fn send_set_temp_cmd(&mut self, temp_celsius: f32) {
        let mut cmd = BytesMut::from(&SET_TEMP_CMD_TEMPLATE[..]);
        cmd[SET_TEMP_BYTE_OFFSET] = (temp_celsius * 2.0).round() as u8;
        let crc_at = cmd.len() - 1;
        cmd[crc_at] = checksum(&cmd[..crc_at], CHECKSUM_SEED_CONTROL);
        self.send_cmd(cmd.freeze(), 2);
    }

    /// Enable recirculation while the unit is in scheduled mode.
    pub fn send_scheduled_recirculation_on_cmd(&mut self) {
        self.send_cmd(Bytes::from_static(&SCHEDULED_RECIRC_ON_CMD), 2);
    }

    /// Disable recirculation while the unit is in scheduled mode.
    pub fn send_scheduled_recirculation_off_cmd(&mut self) {
        self.send_cmd(Bytes::from_static(&SCHEDULED_RECIRC_OFF_CMD), 2);
    }

    /// Broadcast a communication error to every registered visitor. Loss
    /// of bus activity is ambient rather than attributable to one unit,
    /// so all cascade slots are notified. The determination itself
    /// (receive-count stagnation across the polling interval) is the
    /// host's responsibility.
    pub fn notify_error(&mut self) {
        debug!("notifying visitors of communication error");
        for visitor in self.visitors.iter_mut().flatten() {
            visitor.on_error();
        }
    }

    /// Whether a competing controller has been observed on the bus.
    pub fn is_other_navilink_installed(&self) -> bool {
        self.other_navilink_installed
    }

    /// Number of command frames awaiting transmission.
    pub fn pending_commands(&self) -> usize {
        self.cmd_queue.len()
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

/// Look up the visitor for a raw source address. Slot index is the
/// source normalized against the cascade base address; sources outside
/// the cascade range have no slot.
fn visitor_for(
    visitors: &mut [Option<Box<dyn NavienVisitor>>; CASCADE_MAX],
    src: u8,
) -> Option<&mut Box<dyn NavienVisitor>> {
    let slot = src.wrapping_sub(PACKET_SRC_STATUS) as usize;
    if slot < CASCADE_MAX {
        visitors[slot].as_mut()
    } else {
        None
    }
}
