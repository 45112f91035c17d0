//! Static field table for the gateway live-data response.
//!
//! Each entry maps a one-byte identifier to its label, wire width and the
//! conversion applied at render time. The table is plain `static` data,
//! sorted by id, and never mutated.

use serde::{Deserialize, Serialize};

/// Unit-conversion variant carried by every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Temperature,
    Percentage,
    Pressure,
    Direction,
    Velocity,
    Light,
    UltravioletIndex,
    UltravioletDose,
    RainAmount,
    RainRate,
    Raw,
}

/// Wire width of a field value.
///
/// `Opaque` entries are skipped by length and never unpacked as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
    U64,
    Opaque(u8),
}

impl FieldWidth {
    pub const fn len(self) -> usize {
        match self {
            FieldWidth::U8 => 1,
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
            FieldWidth::U64 => 8,
            FieldWidth::Opaque(len) => len as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: u8,
    pub label: &'static str,
    pub width: FieldWidth,
    pub kind: FieldKind,
}

const fn field(id: u8, label: &'static str, width: FieldWidth, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        id,
        label,
        width,
        kind,
    }
}

use FieldKind::*;
use FieldWidth::*;

static FIELDS: [FieldDescriptor; 51] = [
    field(0x01, "INTEMP", U16, Temperature),
    field(0x02, "OUTTEMP", U16, Temperature),
    field(0x03, "DEWPOINT", U16, Temperature),
    field(0x04, "WINDCHILL", U16, Temperature),
    field(0x05, "HEATINDEX", U16, Temperature),
    field(0x06, "INHUMI", U8, Percentage),
    field(0x07, "OUTHUMI", U8, Percentage),
    field(0x08, "ABSBARO", U16, Pressure),
    field(0x09, "RELBARO", U16, Pressure),
    field(0x0A, "WINDDIRECTION", U16, Direction),
    field(0x0B, "WINDSPEED", U16, Velocity),
    field(0x0C, "GUSTSPEED", U16, Velocity),
    field(0x0D, "RAINEVENT", U16, RainAmount),
    field(0x0E, "RAINRATE", U16, RainRate),
    field(0x0F, "RAINHOUR", U16, RainAmount),
    field(0x10, "RAINDAY", U16, RainAmount),
    field(0x11, "RAINWEEK", U16, RainAmount),
    field(0x12, "RAINMONTH", U32, RainAmount),
    field(0x13, "RAINYEAR", U32, RainAmount),
    field(0x14, "RAINTOTALS", U32, RainAmount),
    field(0x15, "LIGHT", U32, Light),
    field(0x16, "UV", U16, UltravioletDose),
    field(0x17, "UVI", U8, UltravioletIndex),
    field(0x18, "TIME", Opaque(6), Raw),
    field(0x19, "DAILYWINDMAX", U16, Velocity),
    field(0x1A, "TEMP1", U16, Temperature),
    field(0x1B, "TEMP2", U16, Temperature),
    field(0x1C, "TEMP3", U16, Temperature),
    field(0x1D, "TEMP4", U16, Temperature),
    field(0x1E, "TEMP5", U16, Temperature),
    field(0x1F, "TEMP6", U16, Temperature),
    field(0x20, "TEMP7", U16, Temperature),
    field(0x21, "TEMP8", U16, Temperature),
    field(0x22, "HUM1", U16, Percentage),
    field(0x23, "HUM2", U16, Percentage),
    field(0x24, "HUM3", U16, Percentage),
    field(0x25, "HUM4", U16, Percentage),
    field(0x26, "HUM5", U16, Percentage),
    field(0x27, "HUM6", U16, Percentage),
    field(0x28, "HUM7", U16, Percentage),
    field(0x29, "HUM8", U16, Percentage),
    field(0x4C, "LOWBAT", Opaque(16), Raw),
    field(0x80, "PIEZO_RAIN_RATE", U16, RainRate),
    field(0x81, "PIEZO_EVENT_RAIN", U16, RainAmount),
    field(0x82, "PIEZO_HOURLY_RAIN", U16, RainAmount),
    field(0x83, "PIEZO_DAILY_RAIN", U32, RainAmount),
    field(0x84, "PIEZO_WEEKLY_RAIN", U32, RainAmount),
    field(0x85, "PIEZO_MONTHLY_RAIN", U32, RainAmount),
    field(0x86, "PIEZO_YEARLY_RAIN", U32, RainAmount),
    field(0x87, "PIEZO_GAIN_10", Opaque(20), Raw),
    field(0x88, "PIEZO_RST_RAINTIME", Opaque(3), Raw),
];

/// Look up the descriptor for a field id.
///
/// Unknown ids return `None`; that is an expected condition for newer
/// firmware, not an error.
///
/// # Examples
/// ```
/// use wxlink_core::{FieldKind, lookup};
///
/// let desc = lookup(0x02).unwrap();
/// assert_eq!(desc.label, "OUTTEMP");
/// assert_eq!(desc.kind, FieldKind::Temperature);
/// assert!(lookup(0x7F).is_none());
/// ```
pub fn lookup(id: u8) -> Option<FieldDescriptor> {
    FIELDS
        .binary_search_by_key(&id, |desc| desc.id)
        .ok()
        .map(|index| FIELDS[index])
}

/// All known fields, ordered by id.
pub fn all() -> &'static [FieldDescriptor] {
    &FIELDS
}
