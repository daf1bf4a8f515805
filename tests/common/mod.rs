#![allow(dead_code)]
//! Shared test support: captured golden frames and a recording visitor.

use std::cell::RefCell;
use std::rc::Rc;

use navien_rs::constants::{HDR_SIZE, PACKET_MARKER};
use navien_rs::navien::checksum::{checksum, seed_for_source};
use navien_rs::{GasStatus, NavienVisitor, WaterStatus};

/// Captured water status frame (41 bytes on the wire), checksum excluded.
pub const WATER_VEC: [u8; 40] = [
    0xF7, 0x05, 0x50, 0x50, 0x90, 0x22, 0x42, 0x00, 0x00, 0x25, 0x14, 0x56, 0x49, 0x49, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x88, 0xC2, 0x00, 0x20, 0x02, 0x00, 0x00, 0x00, 0x21, 0x03,
    0x99, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Checksum of [`WATER_VEC`] under the status seed.
pub const WATER_VEC_CRC: u8 = 0x65;

/// Captured gas status frame (49 bytes on the wire), checksum excluded.
pub const GAS_VEC: [u8; 48] = [
    0xF7, 0x05, 0x50, 0x0F, 0x90, 0x2A, 0x45, 0x00, 0x01, 0x01, 0x14, 0x03, 0x1F, 0x00, 0x56,
    0x56, 0x48, 0x00, 0x00, 0x00, 0x14, 0x01, 0x74, 0x13, 0x0B, 0x44, 0x00, 0x00, 0x9D, 0x07,
    0x60, 0x20, 0x4B, 0x3B, 0x20, 0x00, 0x21, 0x03, 0x00, 0x00, 0x00, 0x00, 0xA6, 0x49, 0x00,
    0x00, 0x01, 0x00,
];

/// Checksum of [`GAS_VEC`] under the status seed.
pub const GAS_VEC_CRC: u8 = 0x36;

/// A second captured gas frame with differing payload bytes.
pub const GAS_VEC_2: [u8; 48] = [
    0xF7, 0x05, 0x50, 0x0F, 0x90, 0x2A, 0x45, 0x00, 0x01, 0x01, 0x14, 0x03, 0x1F, 0x00, 0x56,
    0x49, 0x4B, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x0B, 0x44, 0x00, 0x00, 0x9D, 0x07,
    0x60, 0x20, 0x4B, 0x3B, 0x20, 0x00, 0x21, 0x03, 0x00, 0x00, 0x00, 0x00, 0xA6, 0x49, 0x00,
    0x00, 0x01, 0x00,
];

/// Checksum of [`GAS_VEC_2`] under the status seed.
pub const GAS_VEC_2_CRC: u8 = 0xE5;

/// The captured water frame as it appears on the wire, checksum included.
pub fn water_frame() -> Vec<u8> {
    let mut frame = WATER_VEC.to_vec();
    frame.push(WATER_VEC_CRC);
    frame
}

/// The captured gas frame as it appears on the wire, checksum included.
pub fn gas_frame() -> Vec<u8> {
    let mut frame = GAS_VEC.to_vec();
    frame.push(GAS_VEC_CRC);
    frame
}

/// Build a status frame from header fields and payload, appending a
/// checksum computed the way the device would.
pub fn build_status_frame(src: u8, dst: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![
        PACKET_MARKER,
        0x05,
        src,
        dst,
        0x90,
        payload.len() as u8,
    ];
    frame.extend_from_slice(payload);
    let crc = checksum(&frame, seed_for_source(src));
    frame.push(crc);
    assert_eq!(frame.len(), HDR_SIZE + payload.len() + 1);
    frame
}

/// Everything the engine reported to one visitor slot.
#[derive(Default)]
pub struct Recorder {
    pub water: Vec<(WaterStatus, u8)>,
    pub gas: Vec<(GasStatus, u8)>,
    pub errors: usize,
}

struct RecordingVisitor(Rc<RefCell<Recorder>>);

impl NavienVisitor for RecordingVisitor {
    fn on_water(&mut self, water: &WaterStatus, src: u8) {
        self.0.borrow_mut().water.push((water.clone(), src));
    }

    fn on_gas(&mut self, gas: &GasStatus, src: u8) {
        self.0.borrow_mut().gas.push((gas.clone(), src));
    }

    fn on_error(&mut self) {
        self.0.borrow_mut().errors += 1;
    }
}

/// A visitor that records everything it sees, plus the shared handle to
/// inspect the recording.
pub fn recording_visitor() -> (Rc<RefCell<Recorder>>, Box<dyn NavienVisitor>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    (recorder.clone(), Box::new(RecordingVisitor(recorder)))
}
