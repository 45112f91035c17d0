use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wxlink"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden_capture(case: &str) -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join(case)
        .join("response.hex")
}

const LIVE_DATA: [u8; 44] = [
    0xFF, 0xFF, 0x27, 0x00, 0x2A, 0x01, 0x00, 0xDF, 0x06, 0x23, 0x08, 0x26, 0x28, 0x09, 0x26,
    0x28, 0x02, 0x00, 0xD2, 0x07, 0x2A, 0x0A, 0x00, 0x41, 0x0B, 0x00, 0x00, 0x0C, 0x00, 0x06,
    0x15, 0x00, 0x00, 0x00, 0x00, 0x16, 0x00, 0x00, 0x17, 0x00, 0x19, 0x00, 0x10, 0xDF,
];

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("query").and(contains("decode")).and(contains("fields")));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.hex");

    cmd()
        .arg("decode")
        .arg(missing)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.txt");
    std::fs::write(&input, "FF FF").expect("write capture");

    cmd()
        .arg("decode")
        .arg(input)
        .assert()
        .code(2)
        .stderr(
            contains("unsupported capture format")
                .and(contains(".hex or .bin"))
                .and(contains("hint:")),
        );
}

#[test]
fn decode_prints_listing() {
    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .assert()
        .success()
        .stdout(
            contains("[1]INTEMP\t72.1°")
                .and(contains("[10]WINDDIRECTION\tENE"))
                .and(contains("[25]DAILYWINDMAX\t3.6 mph"))
                .and(contains("1970-01-01T00:00:00Z\n------")),
        );
}

#[test]
fn decode_json_outputs_report() {
    let assert = cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("--json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["response"]["checksum"], 0xDF);
    assert_eq!(value["measurements"].as_array().map(Vec::len), Some(13));
}

#[test]
fn decode_binary_capture() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("response.bin");
    std::fs::write(&input, LIVE_DATA).expect("write capture");

    cmd()
        .arg("decode")
        .arg(input)
        .assert()
        .success()
        .stdout(contains("[7]OUTHUMI\t42.0%"));
}

#[test]
fn glob_matching_several_files_is_an_error() {
    let pattern = repo_root()
        .join("tests")
        .join("golden")
        .join("*")
        .join("response.hex");

    cmd()
        .arg("decode")
        .arg(pattern)
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern").and(contains("hint:")));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("--json")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_file_is_written_and_quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());

    let json = std::fs::read_to_string(&report).expect("read report");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["report_version"], 1);
}

#[test]
fn report_into_missing_directory_is_created() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("nested").join("deeper").join("report.json");

    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));
    assert!(report.is_file());
}

#[test]
fn report_path_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("response.bin");
    std::fs::write(&input, LIVE_DATA).expect("write capture");

    cmd()
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("report path must differ from input"));
    assert_eq!(std::fs::read(&input).expect("read capture"), LIVE_DATA);
}

#[test]
fn pretty_flag_indents_json() {
    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("--json")
        .arg("--pretty")
        .assert()
        .success()
        .stdout(contains("\n  \"report_version\": 1"));
}

#[test]
fn strict_fails_when_decoding_stopped_early() {
    cmd()
        .arg("decode")
        .arg(golden_capture("unknown_field"))
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(
            contains("stopped at unknown field id 90").and(contains("response decoded with issues")),
        );
}

#[test]
fn strict_fails_on_invalid_direction() {
    cmd()
        .arg("decode")
        .arg(golden_capture("invalid_direction"))
        .arg("--strict")
        .assert()
        .failure()
        .stdout(contains("[10]WINDDIRECTION\tinvalid direction 400"));
}

#[test]
fn strict_passes_on_clean_capture() {
    cmd()
        .arg("decode")
        .arg(golden_capture("live_data"))
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn fields_lists_registry() {
    cmd()
        .arg("fields")
        .assert()
        .success()
        .stdout(contains("[1]INTEMP\t2 bytes\ttemperature").and(contains("[24]TIME\t6 bytes\traw")));
}

#[test]
fn query_reads_live_data_from_gateway() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = [0u8; 5];
        stream.read_exact(&mut request).expect("read request");
        stream.write_all(&LIVE_DATA).expect("write response");
        request
    });

    let assert = cmd()
        .arg("query")
        .arg("--addr")
        .arg(addr.to_string())
        .arg("--json")
        .assert()
        .success();

    assert_eq!(server.join().expect("server"), [0xFF, 0xFF, 0x27, 0x03, 0x2A]);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["input"]["source"], addr.to_string());
    assert_eq!(value["measurements"][6]["display"], "ENE");
}

#[test]
fn query_address_from_environment() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    cmd()
        .arg("query")
        .env("WXLINK_ADDR", addr.to_string())
        .env("WXLINK_TIMEOUT_MS", "500")
        .assert()
        .code(2)
        .stderr(contains(format!("cannot reach gateway {addr}")).and(contains("hint:")));
}

#[test]
fn query_rejects_zero_timeout() {
    cmd()
        .arg("query")
        .arg("--timeout-ms")
        .arg("0")
        .assert()
        .failure();
}
