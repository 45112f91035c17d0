//! wxlink core library for weather-station gateway live data.
//!
//! The crate talks to a gateway over a fixed binary request/response
//! protocol: the `protocol` layer encodes requests and decodes responses
//! (layout/reader/registry/parser), `units` turns raw wire integers into
//! display values, `transport` owns the TCP exchange and `station` ties them
//! together into a deterministic, serializable `Report`.
//!
//! Invariants:
//! - Decoding is checksum-gated: no measurement is produced from a buffer
//!   whose declared length or trailer checksum is wrong.
//! - Every byte read is bounds-checked; malformed input yields `Truncated`,
//!   never a panic.
//! - An unrecognized field id ends decoding successfully, keeping every
//!   measurement decoded before it.
//! - Raw values are stored unconverted; conversion happens at render time.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use wxlink_core::decode_capture_file;
//!
//! let report = decode_capture_file(Path::new("response.hex"))?;
//! for m in &report.measurements {
//!     println!("{} {:?}", m.label, m.display);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod capture;
pub mod protocol;
mod station;
pub mod transport;
pub mod units;

pub use protocol::registry::all as all_fields;
pub use protocol::{
    DecodeError, DecodeResult, EncodeError, FieldDescriptor, FieldKind, FieldWidth, Measurement,
    UnknownField, decode, decode_with, encode_command, live_data_request, lookup,
};
pub use station::{StationError, build_report, decode_capture_file, query_live_data};
pub use transport::{TcpTransport, Transport, TransportError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the response time is unknown (captures).
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded live-data report.
///
/// # Examples
/// ```
/// use wxlink_core::make_stub_report;
///
/// let report = make_stub_report("192.168.4.77:45000", 0);
/// assert_eq!(report.report_version, wxlink_core::REPORT_VERSION);
/// assert!(report.measurements.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of when the response was received.
    pub generated_at: String,
    pub input: InputInfo,
    pub response: ResponseSummary,
    /// Measurements in buffer order.
    pub measurements: Vec<MeasurementSummary>,
}

impl Report {
    /// True when decoding stopped at an unknown field or a measurement
    /// could not be converted.
    pub fn has_issues(&self) -> bool {
        self.response.stopped_at.is_some() || self.measurements.iter().any(|m| m.error.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Where the response came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Gateway address or capture path.
    pub source: String,
    /// Response size in bytes, as read.
    pub bytes: u64,
}

/// Header and trailer values copied from the response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub command: u8,
    pub declared_length: u16,
    pub checksum: u8,
    /// First unrecognized field, when decoding stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<StopSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopSummary {
    pub id: u8,
    pub offset: usize,
}

/// One measurement with its rendered value.
///
/// Exactly one of `display` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementSummary {
    pub id: u8,
    pub label: String,
    pub kind: FieldKind,
    pub raw_value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build a report with base fields filled and no measurements.
pub fn make_stub_report(source: &str, bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "wxlink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            source: source.to_string(),
            bytes,
        },
        response: ResponseSummary::default(),
        measurements: vec![],
    }
}
