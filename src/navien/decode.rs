//! # Status Payload Decoding
//!
//! Converts a validated raw frame into strongly typed telemetry. Status
//! frames come in two shapes selected by the destination address: water
//! telemetry (flow and temperatures) and gas/controller telemetry (gas
//! usage, firmware versions, cumulative counters). Either the whole
//! structure decodes or nothing is reported; frames with an unknown
//! destination or a truncated payload decode to
//! [`Payload::Unrecognized`].
//!
//! All scaling here is exact wire semantics: temperatures are transmitted
//! in half-degree Celsius units, flow in deci-liters per minute, gas
//! usage in deci-cubic-meters, capacity in half-percent units. Multi-byte
//! counters arrive as separate `hi`/`lo` bytes combined big-end-first.

use bitflags::bitflags;
use serde::Serialize;

use crate::constants::{
    PACKET_DIR_STATUS, PACKET_DST_GAS, PACKET_DST_WATER, POWER_STATUS_ON_OFF_MASK,
    RECIRC_STATUS_FLAG_HOTBUTTON_ON,
    RECIRC_STATUS_FLAG_SCHEDULED_ON, SYS_STATUS_2_DISPLAY_UNITS, SYS_STATUS_2_HOTBUTTON_ENABLED,
    SYS_STATUS_FLAG_RECIRC_EXT_SCHEDULED, SYS_STATUS_FLAG_RECIRC_INT_SCHEDULED,
    SYS_STATUS_FLAG_UNITS,
};
use crate::navien::frame::Header;

// Water payload offsets, relative to the first byte after the header.
const W_HEATING_MODE: usize = 2;
const W_SYSTEM_POWER: usize = 3;
const W_OPERATING_STATE: usize = 4;
const W_SET_TEMP: usize = 5;
const W_OUTLET_TEMP: usize = 6;
const W_INLET_TEMP: usize = 7;
const W_OPERATING_CAPACITY: usize = 11;
const W_WATER_FLOW: usize = 12;
const W_SYSTEM_STATUS: usize = 18;
const W_BOILER_ACTIVE: usize = 21;
const W_RECIRC_ENABLED: usize = 27;
const W_MIN_PAYLOAD: usize = W_RECIRC_ENABLED + 1;

// Gas payload offsets.
const G_DEVICE_TYPE: usize = 2;
const G_CONTROLLER_VERSION: usize = 4;
const G_PANEL_VERSION: usize = 6;
const G_SET_TEMP: usize = 8;
const G_OUTLET_TEMP: usize = 9;
const G_INLET_TEMP: usize = 10;
const G_SH_OUTLET_TEMP: usize = 11;
const G_SH_RETURN_TEMP: usize = 12;
const G_HEAT_CAPACITY: usize = 14;
const G_SYSTEM_STATUS_2: usize = 15;
const G_CURRENT_GAS_LO: usize = 16;
const G_CURRENT_GAS_HI: usize = 17;
const G_CUMULATIVE_GAS_LO: usize = 18;
const G_CUMULATIVE_GAS_HI: usize = 19;
const G_DAYS_SINCE_INSTALL_LO: usize = 22;
const G_DAYS_SINCE_INSTALL_HI: usize = 23;
const G_DOMESTIC_USAGE_LO: usize = 24;
const G_DOMESTIC_USAGE_HI: usize = 25;
const G_OPERATING_TIME_LO: usize = 30;
const G_OPERATING_TIME_HI: usize = 31;
const G_DHW_USAGE_HOURS_LO: usize = 32;
const G_DHW_USAGE_HOURS_HI: usize = 33;
const G_SH_USAGE_HOURS_LO: usize = 34;
const G_SH_USAGE_HOURS_HI: usize = 35;
const G_MIN_PAYLOAD: usize = G_SH_USAGE_HOURS_HI + 1;

bitflags! {
    /// Water-side system status register. Reserved bits are retained
    /// verbatim but carry no interpretation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct WaterSystemStatus: u8 {
        const RECIRC_INT_SCHEDULED = SYS_STATUS_FLAG_RECIRC_INT_SCHEDULED;
        const RECIRC_EXT_SCHEDULED = SYS_STATUS_FLAG_RECIRC_EXT_SCHEDULED;
        const DISPLAY_METRIC = SYS_STATUS_FLAG_UNITS;
        const _ = !0;
    }
}

bitflags! {
    /// Water-side recirculation-enabled register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct RecircStatus: u8 {
        const HOTBUTTON_ON = RECIRC_STATUS_FLAG_HOTBUTTON_ON;
        const SCHEDULED_ON = RECIRC_STATUS_FLAG_SCHEDULED_ON;
        const _ = !0;
    }
}

bitflags! {
    /// Gas-side secondary status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct GasSystemStatus: u8 {
        const DISPLAY_IMPERIAL = SYS_STATUS_2_DISPLAY_UNITS;
        const HOTBUTTON_ENABLED = SYS_STATUS_2_HOTBUTTON_ENABLED;
        const _ = !0;
    }
}

/// Heating mode reported in water frames. On combi models this reflects
/// the three-way valve position; on recirculating models it also shows an
/// active recirculation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeatingMode {
    Idle,
    Recirculating,
    SpaceHeating,
    DomesticHotWater,
    Unknown(u8),
}

impl From<u8> for HeatingMode {
    fn from(byte: u8) -> Self {
        match byte {
            0x00 => HeatingMode::Idle,
            0x08 => HeatingMode::Recirculating,
            0x10 => HeatingMode::SpaceHeating,
            0x20 => HeatingMode::DomesticHotWater,
            other => HeatingMode::Unknown(other),
        }
    }
}

impl HeatingMode {
    /// The raw wire code.
    pub fn code(&self) -> u8 {
        match *self {
            HeatingMode::Idle => 0x00,
            HeatingMode::Recirculating => 0x08,
            HeatingMode::SpaceHeating => 0x10,
            HeatingMode::DomesticHotWater => 0x20,
            HeatingMode::Unknown(code) => code,
        }
    }
}

/// Decoded water telemetry frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterStatus {
    pub power_on: bool,
    pub heating_mode: HeatingMode,
    /// Raw operating state code; value semantics vary by model.
    pub operating_state: u8,
    pub set_temp_c: f32,
    pub outlet_temp_c: f32,
    pub inlet_temp_c: f32,
    /// Burner utilization in percent.
    pub operating_capacity_pct: f32,
    pub flow_lpm: f32,
    pub system_status: WaterSystemStatus,
    pub boiler_active: bool,
    pub recirculation: RecircStatus,
}

impl WaterStatus {
    pub fn recirc_internal_scheduled(&self) -> bool {
        self.system_status
            .contains(WaterSystemStatus::RECIRC_INT_SCHEDULED)
    }

    pub fn recirc_external_scheduled(&self) -> bool {
        self.system_status
            .contains(WaterSystemStatus::RECIRC_EXT_SCHEDULED)
    }

    /// Front-panel display units; reported temperatures are metric either
    /// way.
    pub fn display_metric(&self) -> bool {
        self.system_status.contains(WaterSystemStatus::DISPLAY_METRIC)
    }

    /// HotButton recirculation is currently running.
    pub fn hot_button_active(&self) -> bool {
        self.recirculation.contains(RecircStatus::HOTBUTTON_ON)
    }

    /// Scheduled-mode recirculation is allowed.
    pub fn scheduled_recirc_enabled(&self) -> bool {
        self.recirculation.contains(RecircStatus::SCHEDULED_ON)
    }

    pub fn outlet_temp_f(&self) -> f32 {
        celsius_to_fahrenheit(self.outlet_temp_c)
    }

    pub fn set_temp_f(&self) -> f32 {
        celsius_to_fahrenheit(self.set_temp_c)
    }

    pub fn flow_gpm(&self) -> f32 {
        lpm_to_gpm(self.flow_lpm)
    }
}

/// Decoded gas/controller telemetry frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasStatus {
    /// Raw device type code.
    pub device_type: u8,
    /// Controller firmware version, e.g. `"2.0"`.
    pub controller_version: String,
    /// Front panel firmware version.
    pub panel_version: String,
    pub set_temp_c: f32,
    pub outlet_temp_c: f32,
    pub inlet_temp_c: f32,
    /// Space-heating outlet temperature (combi models).
    pub sh_outlet_temp_c: f32,
    /// Space-heating return temperature (combi models).
    pub sh_return_temp_c: f32,
    pub heat_capacity_pct: f32,
    /// Instantaneous gas usage in cubic meters.
    pub current_gas_m3: f32,
    /// Lifetime gas usage in cubic meters.
    pub cumulative_gas_m3: f32,
    pub days_since_install: u16,
    /// Lifetime domestic usage counter, in increments of ten uses.
    pub domestic_usage_count: u16,
    pub total_operating_time: u16,
    pub dhw_usage_hours: u16,
    pub sh_usage_hours: u16,
    pub system_status: GasSystemStatus,
}

impl GasStatus {
    pub fn display_imperial(&self) -> bool {
        self.system_status.contains(GasSystemStatus::DISPLAY_IMPERIAL)
    }

    pub fn hot_button_enabled(&self) -> bool {
        self.system_status
            .contains(GasSystemStatus::HOTBUTTON_ENABLED)
    }
}

/// Decoded interpretation of a validated status frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Water(WaterStatus),
    Gas(GasStatus),
    /// Unknown destination or truncated payload; ignored without error
    /// for forward compatibility with unseen packet types.
    Unrecognized,
}

/// Decode a validated frame's payload by `(direction, destination)`.
pub fn decode(header: &Header, payload: &[u8]) -> Payload {
    if header.direction != PACKET_DIR_STATUS {
        return Payload::Unrecognized;
    }
    match header.dst {
        PACKET_DST_WATER => decode_water(payload)
            .map(Payload::Water)
            .unwrap_or(Payload::Unrecognized),
        PACKET_DST_GAS => decode_gas(payload)
            .map(Payload::Gas)
            .unwrap_or(Payload::Unrecognized),
        _ => Payload::Unrecognized,
    }
}

/// Decode a water telemetry payload. Returns `None` when the payload is
/// too short for the full structure; there is no partial decode.
pub fn decode_water(payload: &[u8]) -> Option<WaterStatus> {
    if payload.len() < W_MIN_PAYLOAD {
        return None;
    }
    Some(WaterStatus {
        power_on: payload[W_SYSTEM_POWER] & POWER_STATUS_ON_OFF_MASK != 0,
        heating_mode: HeatingMode::from(payload[W_HEATING_MODE]),
        operating_state: payload[W_OPERATING_STATE],
        set_temp_c: half_degrees(payload[W_SET_TEMP]),
        outlet_temp_c: half_degrees(payload[W_OUTLET_TEMP]),
        inlet_temp_c: half_degrees(payload[W_INLET_TEMP]),
        operating_capacity_pct: half_percent(payload[W_OPERATING_CAPACITY]),
        flow_lpm: deci_units(payload[W_WATER_FLOW]),
        system_status: WaterSystemStatus::from_bits_retain(payload[W_SYSTEM_STATUS]),
        boiler_active: payload[W_BOILER_ACTIVE] & 0x01 != 0,
        recirculation: RecircStatus::from_bits_retain(payload[W_RECIRC_ENABLED]),
    })
}

/// Decode a gas/controller telemetry payload.
pub fn decode_gas(payload: &[u8]) -> Option<GasStatus> {
    if payload.len() < G_MIN_PAYLOAD {
        return None;
    }
    Some(GasStatus {
        device_type: payload[G_DEVICE_TYPE],
        controller_version: format_version(payload[G_CONTROLLER_VERSION]),
        panel_version: format_version(payload[G_PANEL_VERSION]),
        set_temp_c: half_degrees(payload[G_SET_TEMP]),
        outlet_temp_c: half_degrees(payload[G_OUTLET_TEMP]),
        inlet_temp_c: half_degrees(payload[G_INLET_TEMP]),
        sh_outlet_temp_c: half_degrees(payload[G_SH_OUTLET_TEMP]),
        sh_return_temp_c: half_degrees(payload[G_SH_RETURN_TEMP]),
        heat_capacity_pct: half_percent(payload[G_HEAT_CAPACITY]),
        current_gas_m3: deci_units_u16(u16_from_hi_lo(
            payload[G_CURRENT_GAS_HI],
            payload[G_CURRENT_GAS_LO],
        )),
        cumulative_gas_m3: deci_units_u16(u16_from_hi_lo(
            payload[G_CUMULATIVE_GAS_HI],
            payload[G_CUMULATIVE_GAS_LO],
        )),
        days_since_install: u16_from_hi_lo(
            payload[G_DAYS_SINCE_INSTALL_HI],
            payload[G_DAYS_SINCE_INSTALL_LO],
        ),
        domestic_usage_count: u16_from_hi_lo(
            payload[G_DOMESTIC_USAGE_HI],
            payload[G_DOMESTIC_USAGE_LO],
        ),
        total_operating_time: u16_from_hi_lo(
            payload[G_OPERATING_TIME_HI],
            payload[G_OPERATING_TIME_LO],
        ),
        dhw_usage_hours: u16_from_hi_lo(
            payload[G_DHW_USAGE_HOURS_HI],
            payload[G_DHW_USAGE_HOURS_LO],
        ),
        sh_usage_hours: u16_from_hi_lo(payload[G_SH_USAGE_HOURS_HI], payload[G_SH_USAGE_HOURS_LO]),
        system_status: GasSystemStatus::from_bits_retain(payload[G_SYSTEM_STATUS_2]),
    })
}

/// Combine a counter transmitted as separate high/low bytes.
///
/// Every multi-byte counter on the wire is split this way; swapping the
/// argument order silently scales the result by 256.
pub fn u16_from_hi_lo(hi: u8, lo: u8) -> u16 {
    (u16::from(hi) << 8) | u16::from(lo)
}

/// Format a firmware version byte as a dotted two-digit string:
/// `5` becomes `"0.5"`, `23` becomes `"2.3"`.
pub fn format_version(raw: u8) -> String {
    let digits = format!("{raw:02}");
    format!("{}.{}", &digits[..1], &digits[1..2])
}

/// Temperatures are transmitted in half-degree Celsius units.
pub fn half_degrees(raw: u8) -> f32 {
    f32::from(raw) / 2.0
}

/// Capacity values are transmitted in half-percent units.
pub fn half_percent(raw: u8) -> f32 {
    f32::from(raw) * 0.5
}

/// Flow is transmitted in deci-liter units.
pub fn deci_units(raw: u8) -> f32 {
    f32::from(raw) / 10.0
}

/// Gas usage counters are transmitted in deci-cubic-meter units.
pub fn deci_units_u16(raw: u16) -> f32 {
    f32::from(raw) / 10.0
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Liters/min to US gallons/min.
pub fn lpm_to_gpm(lpm: f32) -> f32 {
    lpm / 3.785
}
