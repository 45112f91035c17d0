use log::debug;

use super::checksum::checksum;
use super::error::DecodeError;
use super::layout;
use super::reader::ResponseReader;
use super::registry::{self, FieldDescriptor, FieldKind};
use crate::units::{self, DisplayValue};

/// One decoded field occurrence.
///
/// The raw wire value is kept as-is; conversion happens in [`Measurement::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub id: u8,
    pub label: &'static str,
    pub kind: FieldKind,
    pub raw_value: u64,
}

impl Measurement {
    /// Convert the raw value into its display unit.
    pub fn display_value(&self) -> Result<DisplayValue, DecodeError> {
        units::convert(self.kind, self.raw_value)
    }

    /// Display string with unit suffix (e.g. `72.1°`, `ENE`).
    pub fn render(&self) -> Result<String, DecodeError> {
        self.display_value().map(|value| value.to_string())
    }
}

/// Position of the first unrecognized field id, where decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField {
    pub id: u8,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub command: u8,
    pub declared_length: u16,
    pub checksum: u8,
    pub measurements: Vec<Measurement>,
    pub stopped_at: Option<UnknownField>,
}

/// Decode a live-data response buffer.
///
/// The declared length and checksum are validated before any field is read.
/// Decoding stops without error at the first unrecognized field id; the
/// measurements read before it are returned and the id is reported in
/// `stopped_at`.
///
/// # Examples
/// ```
/// use wxlink_core::decode;
///
/// let buffer = [0xFF, 0xFF, 0x27, 0x00, 0x07, 0x01, 0x00, 0xDF, 0x0E];
/// let result = decode(&buffer)?;
/// assert_eq!(result.measurements[0].label, "INTEMP");
/// assert_eq!(result.measurements[0].raw_value, 223);
/// # Ok::<(), wxlink_core::DecodeError>(())
/// ```
///
/// # Errors
/// `Truncated` when the buffer is shorter than its header declares or a
/// field value runs past the end of the buffer; `ChecksumMismatch` when the trailer
/// disagrees with the body sum.
pub fn decode(buffer: &[u8]) -> Result<DecodeResult, DecodeError> {
    decode_with(buffer, registry::lookup)
}

/// Decode against a caller-supplied field table.
///
/// `decode` uses the built-in device registry; this entry point lets newer
/// firmware tables be layered on top without touching the decoder.
pub fn decode_with<F>(buffer: &[u8], lookup: F) -> Result<DecodeResult, DecodeError>
where
    F: Fn(u8) -> Option<FieldDescriptor>,
{
    let reader = ResponseReader::new(buffer);
    reader.require_len(layout::HEADER_LEN)?;

    let command = reader.read_command()?;
    let declared_length = reader.read_declared_length()?;
    let body_end = usize::from(declared_length) + 1;
    if usize::from(declared_length) < layout::MIN_DECLARED_LENGTH {
        return Err(DecodeError::Truncated {
            needed: layout::HEADER_LEN,
            actual: body_end,
        });
    }

    let trailer_offset = layout::trailer_offset(usize::from(declared_length));
    reader.require_len(trailer_offset + 1)?;
    let body = reader.read_slice(layout::CHECKSUM_BODY_START..body_end)?;
    let expected = reader.read_u8(trailer_offset)?;
    let computed = checksum(body);
    if computed != expected {
        return Err(DecodeError::ChecksumMismatch { expected, computed });
    }

    let mut measurements = Vec::new();
    let mut stopped_at = None;
    let mut offset = layout::FIRST_FIELD_OFFSET;
    while offset < body_end {
        let id = reader.read_u8(offset)?;
        let Some(desc) = lookup(id) else {
            debug!("unknown field id {id:#04x} at offset {offset}, decoding stopped");
            stopped_at = Some(UnknownField { id, offset });
            break;
        };

        // The value may run into the trailer; only the buffer bounds it.
        let value_start = offset + 1;
        let raw_value = reader.read_field_value(value_start, desc.width)?;
        measurements.push(Measurement {
            id,
            label: desc.label,
            kind: desc.kind,
            raw_value,
        });
        offset = value_start + desc.width.len();
    }

    Ok(DecodeResult {
        command,
        declared_length,
        checksum: expected,
        measurements,
        stopped_at,
    })
}
