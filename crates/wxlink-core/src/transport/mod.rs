//! Request/response transports.
//!
//! A transport performs a single blocking exchange: write one request frame,
//! read one response buffer. There is no framing of fragmented responses,
//! no pooling and no retry; errors surface to the caller immediately.

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{DEFAULT_TIMEOUT, RESPONSE_BUFFER_SIZE, TcpTransport};

pub trait Transport {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError>;
}
