use super::error::DecodeError;
use super::layout;
use super::registry::FieldWidth;

pub struct ResponseReader<'a> {
    buffer: &'a [u8],
}

impl<'a> ResponseReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buffer.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or(DecodeError::Truncated {
                needed: offset + 1,
                actual: self.buffer.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, DecodeError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(DecodeError::Truncated {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.buffer.get(range.clone()).ok_or(DecodeError::Truncated {
            needed: range.end,
            actual: self.buffer.len(),
        })
    }

    pub fn read_command(&self) -> Result<u8, DecodeError> {
        self.read_u8(layout::COMMAND_OFFSET)
    }

    pub fn read_declared_length(&self) -> Result<u16, DecodeError> {
        self.read_u16_be(layout::LENGTH_RANGE.clone())
    }

    /// Read a field value of `width` bytes starting at `offset`, big-endian.
    ///
    /// Opaque widths are skipped over and read as zero; only the integer
    /// widths are unpacked.
    pub fn read_field_value(&self, offset: usize, width: FieldWidth) -> Result<u64, DecodeError> {
        let value = match width {
            FieldWidth::U8 => u64::from(self.read_u8(offset)?),
            FieldWidth::U16 => u64::from(u16::from_be_bytes(self.read_array::<2>(offset)?)),
            FieldWidth::U32 => u64::from(u32::from_be_bytes(self.read_array::<4>(offset)?)),
            FieldWidth::U64 => u64::from_be_bytes(self.read_array::<8>(offset)?),
            FieldWidth::Opaque(len) => {
                self.read_slice(offset..offset + usize::from(len))?;
                0
            }
        };
        Ok(value)
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(offset..offset + N)?;
        bytes.try_into().map_err(|_| DecodeError::Truncated {
            needed: offset + N,
            actual: self.buffer.len(),
        })
    }
}
