//! Command-line front end for the STL validator
//!
//! Exit status is 0 when the file passes and 1 otherwise, including when the
//! file cannot be read. Reports go to stdout, logs to stderr.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use stl_validator::{EventOutcome, OutputFormat, ReportOptions, ValidatorConfig, validate_file};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the STL file to validate
    #[arg(value_name = "FILE")]
    file_path: PathBuf,

    /// Downgrade winding-order, naming and negative-coordinate errors to warnings
    #[arg(short, long)]
    tolerant: bool,

    /// Show warnings as well as errors
    #[arg(short, long)]
    warnings: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report a file that could not be validated at all
///
/// JSON mode still emits a failure record on stdout, so pipelines reading
/// stdout always get one record per file.
fn report_unreadable(target: &str, error: &stl_validator::Error, format: OutputFormat) {
    let record = EventOutcome::failure(error.to_string());
    match (format, serde_json::to_string(&record)) {
        (OutputFormat::Json, Ok(json)) => println!("{}", json),
        _ => eprintln!("{}: {}", target, error),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = ValidatorConfig::new().with_tolerant(args.tolerant);
    let options = ReportOptions::new()
        .with_warnings(args.warnings)
        .with_format(args.format.into());
    let target = args.file_path.display().to_string();

    let result = match validate_file(&args.file_path, &config) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "validation could not run");
            report_unreadable(&target, &e, options.format());
            return ExitCode::FAILURE;
        }
    };

    match result.render(&target, &options) {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("{}: {}", target, e);
            return ExitCode::FAILURE;
        }
    }
    if options.format() == OutputFormat::Json {
        println!();
    }

    if result.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
