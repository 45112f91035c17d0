pub const MARKER: [u8; 2] = [0xFF, 0xFF];

pub const COMMAND_OFFSET: usize = 2;
pub const LENGTH_RANGE: std::ops::Range<usize> = 3..5;
pub const HEADER_LEN: usize = 5;
pub const FIRST_FIELD_OFFSET: usize = HEADER_LEN;

/// Checksum body starts at the command byte and runs through the last field byte.
pub const CHECKSUM_BODY_START: usize = COMMAND_OFFSET;

/// Smallest declared length that still covers the command and length bytes.
pub const MIN_DECLARED_LENGTH: usize = LENGTH_RANGE.end - 1;

/// Request size byte counts command + size + checksum on top of the payload.
pub const REQUEST_SIZE_OFFSET: usize = 3;
pub const REQUEST_OVERHEAD: usize = 3;
pub const REQUEST_MAX_PAYLOAD: usize = u8::MAX as usize - REQUEST_OVERHEAD;

pub const CMD_LIVE_DATA: u8 = 0x27;

/// Fixed decimal scale of tenths-encoded quantities.
pub const DECIMAL_SCALE: f64 = 10.0;

pub const fn trailer_offset(declared_length: usize) -> usize {
    declared_length + 1
}
