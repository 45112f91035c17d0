use super::checksum::checksum;
use super::error::EncodeError;
use super::layout;

/// Build an outbound command frame.
///
/// Layout: marker, command, size (`3 + payload.len()`), payload, checksum
/// over everything after the marker.
///
/// # Examples
/// ```
/// use wxlink_core::encode_command;
///
/// let frame = encode_command(0x80, &[0x01])?;
/// assert_eq!(frame, [0xFF, 0xFF, 0x80, 0x04, 0x01, 0x85]);
/// # Ok::<(), wxlink_core::EncodeError>(())
/// ```
pub fn encode_command(command: u8, payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if payload.len() > layout::REQUEST_MAX_PAYLOAD {
        return Err(EncodeError::PayloadTooLarge { len: payload.len() });
    }
    let size = (layout::REQUEST_OVERHEAD + payload.len()) as u8;

    let mut frame = Vec::with_capacity(layout::MARKER.len() + 3 + payload.len());
    frame.extend_from_slice(&layout::MARKER);
    frame.push(command);
    frame.push(size);
    frame.extend_from_slice(payload);
    let sum = checksum(&frame[layout::COMMAND_OFFSET..]);
    frame.push(sum);
    Ok(frame)
}

/// Request frame asking the gateway for its current sensor readings.
pub fn live_data_request() -> Vec<u8> {
    let size = layout::REQUEST_OVERHEAD as u8;
    let sum = checksum(&[layout::CMD_LIVE_DATA, size]);
    let mut frame = layout::MARKER.to_vec();
    frame.extend_from_slice(&[layout::CMD_LIVE_DATA, size, sum]);
    frame
}
