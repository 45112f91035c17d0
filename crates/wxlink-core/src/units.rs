//! Unit conversion for decoded measurements.
//!
//! Conversions are pure functions of the raw wire integer. Tenths-encoded
//! quantities are divided by the protocol's decimal scale first, then mapped
//! to imperial display units. Wind direction maps to a 16-point compass label
//! using the device's own (uneven) sector table.

use std::fmt;

use crate::protocol::error::DecodeError;
use crate::protocol::layout::DECIMAL_SCALE;
use crate::protocol::registry::FieldKind;

pub const MAX_DIRECTION_DEGREES: u64 = 360;

const HPA_PER_INHG: f64 = 33.8638;
const MPH_PER_MS: f64 = 2.237;
const WM2_PER_LUX: f64 = 0.0079;
const MM_PER_INCH: f64 = 25.4;

fn tenths(raw: u64) -> f64 {
    raw as f64 / DECIMAL_SCALE
}

/// Celsius tenths to Fahrenheit.
pub fn fahrenheit(raw: u64) -> f64 {
    tenths(raw) * 1.8 + 32.0
}

/// Hectopascal tenths to inches of mercury.
pub fn inches_of_mercury(raw: u64) -> f64 {
    tenths(raw) / HPA_PER_INHG
}

/// Metres-per-second tenths to miles per hour.
pub fn miles_per_hour(raw: u64) -> f64 {
    tenths(raw) * MPH_PER_MS
}

/// Lux tenths to watts per square metre.
pub fn watts_per_square_metre(raw: u64) -> f64 {
    tenths(raw) * WM2_PER_LUX
}

/// Millimetre tenths to inches.
pub fn inches(raw: u64) -> f64 {
    tenths(raw) / MM_PER_INCH
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl Cardinal {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NNE => "NNE",
            Cardinal::NE => "NE",
            Cardinal::ENE => "ENE",
            Cardinal::E => "E",
            Cardinal::ESE => "ESE",
            Cardinal::SE => "SE",
            Cardinal::SSE => "SSE",
            Cardinal::S => "S",
            Cardinal::SSW => "SSW",
            Cardinal::SW => "SW",
            Cardinal::WSW => "WSW",
            Cardinal::W => "W",
            Cardinal::WNW => "WNW",
            Cardinal::NW => "NW",
            Cardinal::NNW => "NNW",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a direction in whole degrees to its compass sector.
///
/// Sector bounds are lower-inclusive and irregular; `N` wraps
/// across 360/0.
///
/// # Examples
/// ```
/// use wxlink_core::units::{Cardinal, cardinal};
///
/// assert_eq!(cardinal(65).unwrap(), Cardinal::ENE);
/// assert_eq!(cardinal(348).unwrap(), Cardinal::N);
/// assert!(cardinal(361).is_err());
/// ```
pub fn cardinal(degrees: u64) -> Result<Cardinal, DecodeError> {
    let dir = match degrees {
        348..=360 | 0..=10 => Cardinal::N,
        11..=32 => Cardinal::NNE,
        33..=55 => Cardinal::NE,
        56..=77 => Cardinal::ENE,
        78..=100 => Cardinal::E,
        101..=122 => Cardinal::ESE,
        123..=145 => Cardinal::SE,
        146..=167 => Cardinal::SSE,
        168..=190 => Cardinal::S,
        191..=212 => Cardinal::SSW,
        213..=235 => Cardinal::SW,
        236..=257 => Cardinal::WSW,
        258..=280 => Cardinal::W,
        281..=302 => Cardinal::WNW,
        303..=325 => Cardinal::NW,
        326..=347 => Cardinal::NNW,
        _ => return Err(DecodeError::InvalidDirection { degrees }),
    };
    Ok(dir)
}

/// Converted value ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    Scalar { value: f64, unit: &'static str },
    Count(u64),
    Cardinal(Cardinal),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Scalar { value, unit } => write!(f, "{value:.1}{unit}"),
            DisplayValue::Count(raw) => write!(f, "{raw}"),
            DisplayValue::Cardinal(dir) => write!(f, "{dir}"),
        }
    }
}

/// Unit suffix appended to numeric values of a kind.
pub fn unit_suffix(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Temperature => "\u{00B0}",
        FieldKind::Percentage => "%",
        FieldKind::Pressure => " inhg",
        FieldKind::Velocity => " mph",
        FieldKind::Light => " w/m^2",
        FieldKind::RainAmount => " in",
        FieldKind::RainRate => " in/hr",
        FieldKind::UltravioletIndex
        | FieldKind::UltravioletDose
        | FieldKind::Direction
        | FieldKind::Raw => "",
    }
}

/// Apply the conversion selected by `kind` to a raw value.
///
/// Only `Direction` can fail.
pub fn convert(kind: FieldKind, raw: u64) -> Result<DisplayValue, DecodeError> {
    let value = match kind {
        FieldKind::Temperature => fahrenheit(raw),
        FieldKind::Pressure => inches_of_mercury(raw),
        FieldKind::Velocity => miles_per_hour(raw),
        FieldKind::Light => watts_per_square_metre(raw),
        FieldKind::RainAmount | FieldKind::RainRate => inches(raw),
        FieldKind::Percentage | FieldKind::UltravioletIndex | FieldKind::UltravioletDose => {
            raw as f64
        }
        FieldKind::Direction => return cardinal(raw).map(DisplayValue::Cardinal),
        FieldKind::Raw => return Ok(DisplayValue::Count(raw)),
    };
    Ok(DisplayValue::Scalar {
        value,
        unit: unit_suffix(kind),
    })
}
