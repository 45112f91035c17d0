use std::path::Path;

use log::{debug, warn};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::capture::{CaptureError, read_capture};
use crate::protocol::layout::CMD_LIVE_DATA;
use crate::protocol::{DecodeError, DecodeResult, decode, live_data_request};
use crate::transport::{Transport, TransportError};
use crate::{
    DEFAULT_GENERATED_AT, MeasurementSummary, Report, ResponseSummary, StopSummary,
    make_stub_report,
};

#[derive(Debug, Error)]
pub enum StationError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Ask the gateway behind `transport` for live data and decode the answer.
///
/// `source` names the gateway in the report (usually its address).
pub fn query_live_data<T: Transport>(
    transport: &mut T,
    source: &str,
) -> Result<Report, StationError> {
    let request = live_data_request();
    let response = transport.exchange(&request)?;
    debug!("received {} bytes from {source}", response.len());

    let result = decode(&response)?;
    if result.command != CMD_LIVE_DATA {
        warn!(
            "response command {:#04x} does not match request {:#04x}",
            result.command, CMD_LIVE_DATA
        );
    }
    Ok(build_report(source, response.len() as u64, &result, now_rfc3339()))
}

/// Decode a captured response file (`.hex` or `.bin`).
///
/// Captures carry no timestamp, so the report uses `DEFAULT_GENERATED_AT`.
pub fn decode_capture_file(path: &Path) -> Result<Report, StationError> {
    let bytes = read_capture(path)?;
    let result = decode(&bytes)?;
    Ok(build_report(
        &path.display().to_string(),
        bytes.len() as u64,
        &result,
        DEFAULT_GENERATED_AT.to_string(),
    ))
}

/// Fold a decode result into a serializable report.
///
/// Measurements whose conversion fails keep their raw value and carry the
/// error text instead of a display string.
pub fn build_report(source: &str, bytes: u64, result: &DecodeResult, generated_at: String) -> Report {
    let mut report = make_stub_report(source, bytes);
    report.generated_at = generated_at;
    report.response = ResponseSummary {
        command: result.command,
        declared_length: result.declared_length,
        checksum: result.checksum,
        stopped_at: result.stopped_at.map(|stop| StopSummary {
            id: stop.id,
            offset: stop.offset,
        }),
    };
    report.measurements = result
        .measurements
        .iter()
        .map(|m| {
            let (display, error) = match m.render() {
                Ok(text) => (Some(text), None),
                Err(err) => (None, Some(err.to_string())),
            };
            MeasurementSummary {
                id: m.id,
                label: m.label.to_string(),
                kind: m.kind,
                raw_value: m.raw_value,
                display,
                error,
            }
        })
        .collect();
    report
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}

#[cfg(test)]
mod tests {
    use super::{StationError, query_live_data};
    use crate::protocol::DecodeError;
    use crate::transport::{Transport, TransportError};

    struct Scripted {
        response: Vec<u8>,
        requests: Vec<Vec<u8>>,
    }

    impl Transport for Scripted {
        fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
            self.requests.push(request.to_vec());
            Ok(self.response.clone())
        }
    }

    struct Hangup;

    impl Transport for Hangup {
        fn exchange(&mut self, _request: &[u8]) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Closed)
        }
    }

    // INHUMI 35, WINDDIRECTION 361
    const RESPONSE: [u8; 11] = [
        0xFF, 0xFF, 0x27, 0x00, 0x09, 0x06, 0x23, 0x0A, 0x01, 0x69, 0xCD,
    ];

    #[test]
    fn query_sends_live_data_request_and_builds_report() {
        let mut transport = Scripted {
            response: RESPONSE.to_vec(),
            requests: Vec::new(),
        };
        let report = query_live_data(&mut transport, "10.0.0.5:45000").unwrap();

        assert_eq!(transport.requests, vec![vec![0xFF, 0xFF, 0x27, 0x03, 0x2A]]);
        assert_eq!(report.input.source, "10.0.0.5:45000");
        assert_eq!(report.input.bytes, RESPONSE.len() as u64);
        assert_eq!(report.response.checksum, 0xCD);
        assert_eq!(report.measurements.len(), 2);
        assert_eq!(report.measurements[0].display.as_deref(), Some("35.0%"));
        assert!(report.measurements[1].display.is_none());
        assert!(
            report.measurements[1]
                .error
                .as_deref()
                .unwrap()
                .contains("invalid direction")
        );
        assert!(report.has_issues());
    }

    #[test]
    fn query_propagates_decode_errors() {
        let mut response = RESPONSE.to_vec();
        response[10] = 0x00;
        let mut transport = Scripted {
            response,
            requests: Vec::new(),
        };
        let err = query_live_data(&mut transport, "gw").unwrap_err();
        assert!(matches!(
            err,
            StationError::Decode(DecodeError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn query_propagates_transport_errors() {
        let err = query_live_data(&mut Hangup, "gw").unwrap_err();
        assert!(matches!(err, StationError::Transport(TransportError::Closed)));
    }
}
