use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use log::LevelFilter;
use wxlink_core::capture::CaptureError;
use wxlink_core::transport::DEFAULT_TIMEOUT;
use wxlink_core::{Report, StationError, TcpTransport, TransportError};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("WXLINK_BUILD_COMMIT"),
    " ",
    env!("WXLINK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "wxlink")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Query and decode live data from a weather-station gateway.",
    long_about = None,
    after_help = "Examples:\n  wxlink query --addr 192.168.4.77:45000\n  wxlink decode response.hex --json --pretty\n  wxlink fields"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG also works
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a gateway for live data and print the measurements.
    Query {
        /// Gateway address (host:port)
        #[arg(long, env = "WXLINK_ADDR", default_value = "192.168.4.77:45000")]
        addr: String,

        /// Connect, read and write timeout in milliseconds
        #[arg(
            long,
            env = "WXLINK_TIMEOUT_MS",
            default_value_t = DEFAULT_TIMEOUT.as_millis() as u64,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        timeout_ms: u64,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a captured response (.hex or .bin) without a device.
    #[command(
        after_help = "Examples:\n  wxlink decode response.hex\n  wxlink decode 'captures/*.bin' --json"
    )]
    Decode {
        /// Path (or glob matching one file) to a .hex or .bin capture
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the known field ids.
    Fields,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Print the JSON report to stdout instead of the text listing
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this path
    #[arg(short = 'o', long)]
    report: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output besides the listing or JSON
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if decoding stopped early or a value failed to convert
    #[arg(long)]
    strict: bool,
}

impl OutputArgs {
    /// `--compact` is the default; clap rejects it together with `--pretty`.
    fn pretty_json(&self) -> bool {
        self.pretty && !self.compact
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Query {
            addr,
            timeout_ms,
            output,
        } => cmd_query(&addr, Duration::from_millis(timeout_ms), &output),
        Commands::Decode { input, output } => cmd_decode(&input, &output),
        Commands::Fields => cmd_fields(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_query(addr: &str, timeout: Duration, output: &OutputArgs) -> Result<(), CliError> {
    let mut transport = TcpTransport::connect(addr, timeout).map_err(|err| {
        CliError::new(
            format!("cannot reach gateway {}: {}", addr, err),
            Some(connect_hint(&err)),
        )
    })?;

    let rep = wxlink_core::query_live_data(&mut transport, addr).map_err(|err| match err {
        StationError::Transport(TransportError::Closed) => CliError::new(
            format!("gateway {} closed the connection without answering", addr),
            Some("check that the address points at the gateway's API port".to_string()),
        ),
        other => CliError::from(anyhow::Error::new(other).context("live-data query failed")),
    })?;

    emit_report(&rep, output)
}

fn connect_hint(err: &TransportError) -> String {
    match err {
        TransportError::Resolve { .. } => "use host:port, e.g. 192.168.4.77:45000".to_string(),
        _ => "check --addr / WXLINK_ADDR, or raise --timeout-ms".to_string(),
    }
}

fn cmd_decode(input: &Path, output: &OutputArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;

    if let Some(report_path) = output.report.as_ref() {
        let input_abs = fs::canonicalize(&resolved_input).with_context(|| {
            format!("Failed to resolve input path: {}", resolved_input.display())
        })?;
        if same_file_target(report_path, &input_abs)? {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }

    let rep = wxlink_core::decode_capture_file(&resolved_input).map_err(|err| match err {
        StationError::Capture(err @ CaptureError::UnsupportedFormat(_)) => CliError::new(
            err.to_string(),
            Some("rename the capture to .hex (text) or .bin (raw bytes)".to_string()),
        ),
        other => CliError::from(
            anyhow::Error::new(other)
                .context(format!("decoding {} failed", resolved_input.display())),
        ),
    })?;

    emit_report(&rep, output)
}

fn same_file_target(report_path: &Path, input_abs: &Path) -> Result<bool, CliError> {
    let parent = match report_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Ok(false),
    };
    // A directory that does not exist yet cannot hold the input.
    if !parent.exists() {
        return Ok(false);
    }
    let report_dir = fs::canonicalize(parent)
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    Ok(report_dir.join(file_name) == input_abs)
}

fn cmd_fields() -> Result<(), CliError> {
    for field in wxlink_core::all_fields() {
        let kind = serde_json::to_value(field.kind).context("JSON serialization failed")?;
        println!(
            "[{}]{}\t{} bytes\t{}",
            field.id,
            field.label,
            field.width.len(),
            kind.as_str().unwrap_or_default()
        );
    }
    Ok(())
}

fn emit_report(rep: &Report, output: &OutputArgs) -> Result<(), CliError> {
    if output.json {
        print!("{}", serialize_report(rep, output.pretty_json())?);
    } else {
        print_listing(rep);
    }

    if let Some(report) = output.report.as_ref() {
        let json = serialize_report(rep, output.pretty_json())?;
        if let Some(parent) = report.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
        if !output.quiet {
            eprintln!("OK: report written -> {}", report.display());
        }
    }

    if !output.quiet {
        print_issues(rep);
    }
    if output.strict && rep.has_issues() {
        return Err(CliError::new(
            "response decoded with issues",
            Some("run without --quiet to list them, or use --json".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_listing(rep: &Report) {
    for m in &rep.measurements {
        let value = match (&m.display, &m.error) {
            (Some(display), _) => display.as_str(),
            (None, Some(error)) => error.as_str(),
            (None, None) => "",
        };
        println!("[{}]{}\t{}", m.id, m.label, value);
    }
    println!("{}", rep.generated_at);
    println!("------");
}

fn print_issues(rep: &Report) {
    if let Some(stop) = rep.response.stopped_at.as_ref() {
        eprintln!(
            "warning: decoding stopped at unknown field id {} (offset {})",
            stop.id, stop.offset
        );
    }
    for m in rep.measurements.iter().filter(|m| m.error.is_some()) {
        eprintln!(
            "warning: [{}]{} raw {}: {}",
            m.id,
            m.label,
            m.raw_value,
            m.error.as_deref().unwrap_or_default()
        );
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .hex or .bin capture file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .hex or .bin capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .hex or .bin".to_string()),
        ));
    }
    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches); matches: ",
            pattern,
            matches.len()
        );
        message.push_str(
            &matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
