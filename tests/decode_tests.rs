//! Tests for payload decoding: exact field transforms on captured
//! frames, firmware version formatting, status bits and the hi/lo
//! counter combination.

mod common;

use common::{GAS_VEC, WATER_VEC};
use navien_rs::constants::HDR_SIZE;
use navien_rs::navien::decode::{
    decode_gas, decode_water, format_version, u16_from_hi_lo, HeatingMode,
};
use proptest::prelude::*;

/// Every documented field of the captured water frame decodes to its
/// known value.
#[test]
fn test_water_fields() {
    let water = decode_water(&WATER_VEC[HDR_SIZE..]).unwrap();

    assert!(water.power_on);
    assert_eq!(water.heating_mode, HeatingMode::Idle);
    assert_eq!(water.operating_state, 0x14);
    assert_eq!(water.set_temp_c, 43.0);
    assert_eq!(water.outlet_temp_c, 36.5);
    assert_eq!(water.inlet_temp_c, 36.5);
    assert_eq!(water.operating_capacity_pct, 0.0);
    assert_eq!(water.flow_lpm, 0.0);
    assert!(!water.boiler_active);

    // system_status 0x02: externally scheduled recirculation only
    assert!(!water.recirc_internal_scheduled());
    assert!(water.recirc_external_scheduled());
    assert!(!water.display_metric());

    // recirculation_enabled 0x02: allowed by schedule, hot button idle
    assert!(!water.hot_button_active());
    assert!(water.scheduled_recirc_enabled());
}

/// Every documented field of the captured gas frame decodes to its known
/// value, most importantly the four hi/lo counters.
#[test]
fn test_gas_fields() {
    let gas = decode_gas(&GAS_VEC[HDR_SIZE..]).unwrap();

    assert_eq!(gas.device_type, 0x01);
    assert_eq!(gas.controller_version, "2.0"); // raw 20
    assert_eq!(gas.panel_version, "3.1"); // raw 31
    assert_eq!(gas.set_temp_c, 43.0);
    assert_eq!(gas.outlet_temp_c, 43.0);
    assert_eq!(gas.inlet_temp_c, 36.0);
    assert_eq!(gas.sh_outlet_temp_c, 0.0);
    assert_eq!(gas.sh_return_temp_c, 0.0);
    assert_eq!(gas.heat_capacity_pct, 10.0);

    // 16-bit counters: lo byte first on the wire
    assert_eq!(gas.current_gas_m3, 498.0); // 0x1374 / 10
    assert_eq!(gas.cumulative_gas_m3, 1741.9); // 0x440B / 10
    assert_eq!(gas.days_since_install, 0x079D);
    assert_eq!(gas.domestic_usage_count, 0x2060);
    assert_eq!(gas.total_operating_time, 0x0321);
    assert_eq!(gas.dhw_usage_hours, 0);
    assert_eq!(gas.sh_usage_hours, 0);

    // system_status_2 0x01: imperial display, hot button not enabled
    assert!(gas.display_imperial());
    assert!(!gas.hot_button_enabled());
}

/// Version bytes format as a zero-padded dotted pair.
#[test]
fn test_version_formatting() {
    assert_eq!(format_version(5), "0.5");
    assert_eq!(format_version(23), "2.3");
    assert_eq!(format_version(0), "0.0");
    assert_eq!(format_version(7), "0.7");
    assert_eq!(format_version(99), "9.9");
}

/// Heating mode codes map to the documented modes; unknown codes are
/// preserved rather than guessed at.
#[test]
fn test_heating_mode_codes() {
    assert_eq!(HeatingMode::from(0x00), HeatingMode::Idle);
    assert_eq!(HeatingMode::from(0x08), HeatingMode::Recirculating);
    assert_eq!(HeatingMode::from(0x10), HeatingMode::SpaceHeating);
    assert_eq!(HeatingMode::from(0x20), HeatingMode::DomesticHotWater);
    assert_eq!(HeatingMode::from(0x42), HeatingMode::Unknown(0x42));
    assert_eq!(HeatingMode::from(0x42).code(), 0x42);
}

/// A payload shorter than the full structure decodes to nothing at all.
#[test]
fn test_no_partial_decode() {
    assert!(decode_water(&WATER_VEC[HDR_SIZE..HDR_SIZE + 20]).is_none());
    assert!(decode_gas(&GAS_VEC[HDR_SIZE..HDR_SIZE + 30]).is_none());
    assert!(decode_water(&[]).is_none());
    assert!(decode_gas(&[]).is_none());
}

/// Imperial conversion helpers.
#[test]
fn test_imperial_views() {
    let water = decode_water(&WATER_VEC[HDR_SIZE..]).unwrap();
    assert_eq!(water.set_temp_f(), 43.0 * 9.0 / 5.0 + 32.0);
    assert_eq!(water.flow_gpm(), 0.0);
}

proptest! {
    /// Counters transmitted as hi/lo byte pairs combine as hi*256 + lo.
    #[test]
    fn prop_counter_combination(hi: u8, lo: u8) {
        prop_assert_eq!(u16_from_hi_lo(hi, lo), u16::from(hi) * 256 + u16::from(lo));
    }

    /// Swapping the byte order changes the value whenever the bytes
    /// differ, so an accidental hi/lo swap cannot go unnoticed.
    #[test]
    fn prop_counter_order_matters(hi: u8, lo: u8) {
        prop_assume!(hi != lo);
        prop_assert_ne!(u16_from_hi_lo(hi, lo), u16_from_hi_lo(lo, hi));
    }
}
