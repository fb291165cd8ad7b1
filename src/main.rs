//! testwright CLI entry point

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use testwright::report::{format_complexity, format_suite, format_validation, to_json};
use testwright::{
    complexity_report, extract, Cli, Command, OutputFormat, SessionMemory, TestwrightError,
};

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "TESTWRIGHT_LOG";

/// What a command printed and whether every input passed
struct Outcome {
    output: String,
    passed: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.default_log_level());

    match run(&cli) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if outcome.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        // Fall back to the default level if the variable is unset or invalid
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> testwright::Result<Outcome> {
    match &cli.command {
        Command::Analyze { files } => run_analyze(cli, files),
        Command::Validate { files, source } => run_validate(cli, files, source.as_deref()),
        Command::Complexity { file } => run_complexity(cli, file),
    }
}

/// Read one input file, refusing missing or oversized files
fn read_source(path: &Path, limit: usize) -> testwright::Result<String> {
    if !path.exists() {
        return Err(TestwrightError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let size = fs::metadata(path)?.len() as usize;
    if size > limit {
        return Err(TestwrightError::SourceTooLarge {
            path: path.display().to_string(),
            size,
            limit,
        });
    }

    let source = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = source.len(), "read source");
    Ok(source)
}

fn run_analyze(cli: &Cli, files: &[PathBuf]) -> testwright::Result<Outcome> {
    let memory = SessionMemory::new();
    let session = memory.open_session();
    info!(session = %session, files = files.len(), "analyzing");

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let path = file.as_path();
        let source = read_source(path, cli.max_source_bytes)?;
        let suite = memory.analyze(&session, &source)?;
        results.push((path.display().to_string(), suite));
    }

    let output = match cli.format {
        OutputFormat::Json => to_json(&json!({
            "session": session,
            "results": results
                .iter()
                .map(|(file, suite)| json!({ "file": file, "suite": suite }))
                .collect::<Vec<_>>(),
        }))?,
        OutputFormat::Text => results
            .iter()
            .map(|(file, suite)| format_suite(file, suite))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    Ok(Outcome {
        output,
        passed: true,
    })
}

fn run_validate(
    cli: &Cli,
    files: &[PathBuf],
    source: Option<&Path>,
) -> testwright::Result<Outcome> {
    let related = source
        .map(|path| read_source(path, cli.max_source_bytes))
        .transpose()?;

    let memory = SessionMemory::new();
    let session = memory.open_session();
    info!(session = %session, files = files.len(), "validating");

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let path = file.as_path();
        let candidate = read_source(path, cli.max_source_bytes)?;
        let report = memory.validate(&session, &candidate, related.as_deref());
        if let Some(summary) = report.summary.as_ref().filter(|_| report.is_valid) {
            memory.learn_from_success(&session, summary);
        }
        results.push((path.display().to_string(), report));
    }

    let passed = results.iter().all(|(_, report)| report.is_valid);
    let output = match cli.format {
        OutputFormat::Json => to_json(&json!({
            "session": session,
            "results": results
                .iter()
                .map(|(file, report)| json!({ "file": file, "report": report }))
                .collect::<Vec<_>>(),
        }))?,
        OutputFormat::Text => results
            .iter()
            .map(|(file, report)| format_validation(file, report))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    Ok(Outcome { output, passed })
}

fn run_complexity(cli: &Cli, file: &Path) -> testwright::Result<Outcome> {
    let source = read_source(file, cli.max_source_bytes)?;
    let units = complexity_report(&extract(&source)?);
    let target = file.display().to_string();

    let output = match cli.format {
        OutputFormat::Json => to_json(&json!({ "file": target, "units": units }))?,
        OutputFormat::Text => format_complexity(&target, &units),
    };

    Ok(Outcome {
        output,
        passed: true,
    })
}
