//! Gateway wire protocol.
//!
//! Layering:
//! - `layout`: byte offsets and protocol constants (source of truth)
//! - `reader`: bounds-checked byte access
//! - `registry`: static field table (id -> label, width, kind)
//! - `parser`: response decoding (no direct byte indexing)
//! - `encoder` / `checksum`: outbound request frames
//! - `error`: explicit, actionable errors
//!
//! Everything here is pure and free of I/O; `transport` and `station` own
//! the socket and orchestration.

pub mod checksum;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod registry;

pub use encoder::{encode_command, live_data_request};
pub use error::{DecodeError, EncodeError};
pub use parser::{DecodeResult, Measurement, UnknownField, decode, decode_with};
pub use registry::{FieldDescriptor, FieldKind, FieldWidth, lookup};
