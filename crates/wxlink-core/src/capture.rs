//! Captured response files.
//!
//! A capture is one raw response buffer stored either as bytes (`.bin`) or
//! as text hex (`.hex`, whitespace and `0x` prefixes allowed, `#` starts a
//! comment line).

use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex in capture: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("unsupported capture format '{0}' (expected .hex or .bin)")]
    UnsupportedFormat(String),
}

/// Read a capture file, choosing the format from the extension.
pub fn read_capture(path: &Path) -> Result<Vec<u8>, CaptureError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "bin" => Ok(fs::read(path)?),
        "hex" => parse_hex(&fs::read_to_string(path)?),
        _ => Err(CaptureError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Parse text hex such as `FF FF 27 00 2A ...`.
///
/// # Examples
/// ```
/// use wxlink_core::capture::parse_hex;
///
/// let bytes = parse_hex("FF ff 0x27\n00 2a").unwrap();
/// assert_eq!(bytes, [0xFF, 0xFF, 0x27, 0x00, 0x2A]);
/// ```
pub fn parse_hex(text: &str) -> Result<Vec<u8>, CaptureError> {
    let digits: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split_whitespace())
        .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    Ok(hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::{CaptureError, parse_hex, read_capture};
    use std::path::Path;

    #[test]
    fn parse_hex_accepts_spacing_and_comments() {
        let text = "# live data\nFFFF 27\n  00 2A\n";
        assert_eq!(parse_hex(text).unwrap(), vec![0xFF, 0xFF, 0x27, 0x00, 0x2A]);
    }

    #[test]
    fn parse_hex_rejects_odd_digits() {
        assert!(matches!(parse_hex("FF F"), Err(CaptureError::InvalidHex(_))));
        assert!(matches!(parse_hex("ZZ"), Err(CaptureError::InvalidHex(_))));
    }

    #[test]
    fn read_capture_rejects_unknown_extension() {
        let err = read_capture(Path::new("capture.pcap")).unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedFormat(_)));
    }
}
