//! Command-line interface for revstamp
//!
//! The CLI is the host surface for build integrations that cannot link the
//! library directly: it reads a run configuration, consumes the record
//! streams collected by an external producer, and prints the resulting
//! properties for the build to pick up.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::error;

use crate::entry::{RecordSource, run_entries};
use revstamp_config::{EntryConfig, RunConfig};
use revstamp_props::PropertyMap;
use revstamp_status::StatusRecord;
use revstamp_utils::error::{RevstampError, SourceError};
use revstamp_utils::exit_codes::ExitCode;
use revstamp_utils::logging;

/// revstamp - working-copy revision and status stamping for build pipelines
#[derive(Parser)]
#[command(name = "revstamp")]
#[command(about = "Summarize working-copy status streams into build properties")]
#[command(long_about = r#"
revstamp folds the per-path status observations collected by an external
working-copy walk into one compact summary per configured entry (revision
range, last-committed revision and date, and a terse status code), and prints
the summaries as named build properties.

EXAMPLES:
  # Fold the collected records for the entries in revstamp.toml
  revstamp --config revstamp.toml --records records.json

  # Read the record streams from stdin and emit JSON
  status-walker | revstamp --records - --format json

  # Keep going when the producer failed on some entry
  revstamp --records records.json --keep-going

RECORDS:
  The records file is a JSON object mapping each configured entry path to its
  array of status records, exactly as collected by the producer. An entry
  path missing from the object is treated as not under version control.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to the run configuration file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Path to the collected record streams ("-" for stdin)
    #[arg(long)]
    pub records: Utf8PathBuf,

    /// Output format for the registered properties
    #[arg(long, value_enum, default_value_t = OutputFormat::Properties)]
    pub format: OutputFormat,

    /// Log and continue with empty summaries when the producer fails
    #[arg(long)]
    pub keep_going: bool,

    /// Enable verbose output (per-record fold trace)
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the property set is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `name=value` lines, one property per line.
    #[default]
    Properties,
    /// A JSON array of `{"name": ..., "value": ...}` objects, preserving the
    /// documented property order.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Properties => write!(f, "properties"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Record streams keyed by entry path, as collected by an external producer.
///
/// A path with no stream in the document is reported as not under version
/// control, which the pipeline degrades to the unversioned summary.
#[derive(Debug)]
pub struct JsonRecordSource {
    streams: BTreeMap<String, Vec<StatusRecord>>,
}

impl JsonRecordSource {
    /// Parse a records document.
    ///
    /// # Errors
    ///
    /// Returns [`RevstampError::Records`] when the document is not a JSON
    /// object of record arrays.
    pub fn from_json(origin: &str, contents: &str) -> Result<Self, RevstampError> {
        let streams: BTreeMap<String, Vec<StatusRecord>> = serde_json::from_str(contents)
            .map_err(|e| RevstampError::Records {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { streams })
    }
}

impl RecordSource for JsonRecordSource {
    fn status(&self, entry: &EntryConfig) -> Result<Vec<StatusRecord>, SourceError> {
        match self.streams.get(entry.path.as_str()) {
            Some(records) => Ok(records.clone()),
            None => Err(SourceError::NotWorkingCopy {
                path: entry.path.to_string(),
            }),
        }
    }
}

/// CLI entry point. Handles all output including errors; the caller only
/// maps the returned exit code to the process exit.
///
/// # Errors
///
/// Returns the exit code to terminate with on failure.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return Err(err.to_exit_code());
        }
    };

    // logging must come up before the pipeline so degraded failures and
    // collision warnings are visible
    let verbose = cli.verbose || config.verbose;
    let _ = logging::init_tracing(verbose);

    match run_with(&cli, &config) {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("{err}");
            Err(err.to_exit_code())
        }
    }
}

fn load_config(path: Option<&Utf8Path>) -> Result<RunConfig, RevstampError> {
    match path {
        Some(path) => Ok(RunConfig::load(path)?),
        None => Ok(RunConfig::default()),
    }
}

fn run_with(cli: &Cli, config: &RunConfig) -> Result<(), RevstampError> {
    let entries = config.resolve_entries()?;
    let source = load_records(&cli.records)?;
    let fail_on_error = config.fail_on_error && !cli.keep_going;

    let mut properties = PropertyMap::new();
    run_entries(&source, None, &entries, fail_on_error, &mut properties)?;

    print_properties(&properties, cli.format);
    Ok(())
}

fn load_records(path: &Utf8Path) -> Result<JsonRecordSource, RevstampError> {
    if path.as_str() == "-" {
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        return JsonRecordSource::from_json("<stdin>", &contents);
    }
    let contents = fs::read_to_string(path)?;
    JsonRecordSource::from_json(path.as_str(), &contents)
}

fn print_properties(properties: &PropertyMap, format: OutputFormat) {
    match format {
        OutputFormat::Properties => {
            for (name, value) in properties.iter() {
                println!("{name}={value}");
            }
        }
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = properties
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&items).expect("property list serializes")
            );
        }
    }
}
