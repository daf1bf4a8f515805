//! Unit tests for the checksum module: the rolling checksum against the
//! captured golden vectors, and its degenerate and seed-selection
//! behavior.

mod common;

use common::{GAS_VEC, GAS_VEC_2, GAS_VEC_2_CRC, GAS_VEC_CRC, WATER_VEC, WATER_VEC_CRC};
use navien_rs::constants::{CHECKSUM_SEED_CONTROL, CHECKSUM_SEED_STATUS, NAVILINK_PRESENT};
use navien_rs::navien::checksum::{checksum, seed_for_source};

/// The short-format (water) golden vector checksums to its captured value.
#[test]
fn test_water_vector() {
    assert_eq!(checksum(&WATER_VEC, CHECKSUM_SEED_STATUS), WATER_VEC_CRC);
}

/// The long-format (gas) golden vector checksums to its captured value.
#[test]
fn test_gas_vector() {
    assert_eq!(checksum(&GAS_VEC, CHECKSUM_SEED_STATUS), GAS_VEC_CRC);
}

/// A second long-format vector with different payload bytes produces a
/// different, known checksum.
#[test]
fn test_gas_vector_variant() {
    assert_eq!(checksum(&GAS_VEC_2, CHECKSUM_SEED_STATUS), GAS_VEC_2_CRC);
}

/// Inputs shorter than two bytes always produce zero, regardless of
/// content or seed.
#[test]
fn test_degenerate_inputs() {
    for seed in [CHECKSUM_SEED_STATUS, CHECKSUM_SEED_CONTROL, 0x00, 0xFF] {
        assert_eq!(checksum(&[], seed), 0x00);
        assert_eq!(checksum(&[0x00], seed), 0x00);
        assert_eq!(checksum(&[0xF7], seed), 0x00);
        assert_eq!(checksum(&[0xFF], seed), 0x00);
    }
}

/// The control-frame seed is a different algorithm parameter, not a
/// constant offset: the same bytes checksum differently.
#[test]
fn test_seed_sensitivity() {
    assert_ne!(
        checksum(&WATER_VEC, CHECKSUM_SEED_STATUS),
        checksum(&WATER_VEC, CHECKSUM_SEED_CONTROL)
    );
}

/// The captured presence announcement carries a valid control-seed
/// checksum as its final byte.
#[test]
fn test_presence_frame_checksum() {
    let (body, crc) = NAVILINK_PRESENT.split_at(NAVILINK_PRESENT.len() - 1);
    assert_eq!(checksum(body, CHECKSUM_SEED_CONTROL), crc[0]);
}

/// Status frames from the primary unit use one seed; cascade units and
/// control traffic use the other.
#[test]
fn test_seed_selection() {
    assert_eq!(seed_for_source(0x50), CHECKSUM_SEED_STATUS);
    for src in [0x0F, 0x51, 0x52, 0x5F, 0x00, 0xFF] {
        assert_eq!(seed_for_source(src), CHECKSUM_SEED_CONTROL);
    }
}

/// Flipping any single bit of the payload changes the checksum for at
/// least the captured vectors (sanity check that every byte position
/// participates).
#[test]
fn test_every_byte_participates() {
    let reference = checksum(&WATER_VEC, CHECKSUM_SEED_STATUS);
    for i in 0..WATER_VEC.len() {
        let mut mutated = WATER_VEC;
        mutated[i] ^= 0x01;
        assert_ne!(
            checksum(&mutated, CHECKSUM_SEED_STATUS),
            reference,
            "bit flip at byte {i} went undetected"
        );
    }
}
