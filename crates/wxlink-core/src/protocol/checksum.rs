/// Sum of all bytes, modulo 256.
///
/// Used for both request trailers and response verification.
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
