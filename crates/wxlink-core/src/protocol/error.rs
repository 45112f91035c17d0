use thiserror::Error;

/// Errors returned by response decoding and measurement rendering.
///
/// `Truncated` and `ChecksumMismatch` invalidate the whole buffer.
/// `InvalidDirection` only affects the single measurement being rendered.
///
/// # Examples
/// ```
/// use wxlink_core::DecodeError;
///
/// let err = DecodeError::ChecksumMismatch { expected: 0xDF, computed: 0xDE };
/// assert!(err.to_string().contains("checksum mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("response truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("checksum mismatch: trailer {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { expected: u8, computed: u8 },
    #[error("invalid direction {degrees}, must be 0..=360")]
    InvalidDirection { degrees: u64 },
}

/// Errors returned by command encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("payload too large for size byte: {len} bytes")]
    PayloadTooLarge { len: usize },
}
