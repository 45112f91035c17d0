//! Rewrite `tests/golden/<case>/expected_report.json` from each case's capture.
//!
//! Run from the repository root. `--check` compares instead of writing and
//! exits non-zero when any expectation is stale.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wxlink_core::decode_capture_file;

/// Capture names tried per case, in order.
const CAPTURE_NAMES: [&str; 2] = ["response.hex", "response.bin"];

fn main() -> ExitCode {
    let check = env::args().skip(1).any(|arg| arg == "--check");
    match run(check) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(stale) => {
            eprintln!("{stale} golden report(s) out of date; rerun without --check");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(check: bool) -> Result<usize, String> {
    let root = PathBuf::from("tests").join("golden");
    let mut cases: Vec<PathBuf> = fs::read_dir(&root)
        .map_err(|err| format!("failed to read {}: {}", root.display(), err))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_dir())
        .collect();
    cases.sort();

    let mut stale = 0;
    for case in cases {
        let Some(capture) = CAPTURE_NAMES
            .iter()
            .map(|name| case.join(name))
            .find(|path| path.is_file())
        else {
            eprintln!("skip {}: no response.hex or response.bin", case.display());
            continue;
        };
        let output = case.join("expected_report.json");
        let json = render_case(&capture)?;
        if check {
            let current = fs::read_to_string(&output).unwrap_or_default();
            if current != json {
                eprintln!("stale: {}", output.display());
                stale += 1;
            }
        } else {
            fs::write(&output, json)
                .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
            eprintln!("wrote {}", output.display());
        }
    }
    Ok(stale)
}

/// Decode one capture into the compact JSON stored as its expectation.
///
/// The source is recorded with `/` separators so expectations match across
/// platforms.
fn render_case(capture: &Path) -> Result<String, String> {
    let mut report = decode_capture_file(capture)
        .map_err(|err| format!("decoding failed for {}: {}", capture.display(), err))?;
    report.input.source = capture
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    serde_json::to_string(&report).map_err(|err| format!("JSON serialization failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::render_case;
    use std::fs;
    use std::path::Path;

    #[test]
    fn render_case_matches_stored_expectation() {
        let case = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tests")
            .join("golden")
            .join("live_data");
        let rendered = render_case(&case.join("response.hex")).expect("render");
        let stored = fs::read_to_string(case.join("expected_report.json")).expect("read");

        let mut rendered: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        let stored: serde_json::Value = serde_json::from_str(&stored).expect("json");
        assert!(rendered["input"]["source"].as_str().unwrap().ends_with("live_data/response.hex"));
        rendered["input"]["source"] = stored["input"]["source"].clone();
        assert_eq!(rendered, stored);
    }
}
