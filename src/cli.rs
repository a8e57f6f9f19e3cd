//! Command-line interface parsing for cfbfeed
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`: where to read the sheet from, how long to
//! cache it, and how to print it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::data::{to_csv, Record, TableResponse};
use crate::feed::FeedConfig;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// None of --url, --file or --sheet-id was given
    #[error("no source given: pass --url, --file or --sheet-id (or set CFBFEED_URL)")]
    NoSource,

    /// More than one source was given
    #[error("conflicting sources: pass only one of --url, --file or --sheet-id")]
    ConflictingSources,

    /// --gid without --sheet-id
    #[error("--gid requires --sheet-id")]
    GidWithoutSheet,

    /// Zero-second request timeout
    #[error("--timeout-secs must be greater than zero")]
    ZeroTimeout,

    /// Zero-second watch interval
    #[error("--watch interval must be greater than zero")]
    ZeroWatchInterval,
}

/// How records are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `{"data": [...]}`
    #[default]
    Json,
    /// Program,Conference,Date rows
    Csv,
}

/// cfbfeed - fetch, normalize and cache college-football sheet data
#[derive(Parser, Debug)]
#[command(name = "cfbfeed")]
#[command(about = "Fetch, normalize and cache college-football sheet data")]
#[command(version)]
pub struct Cli {
    /// URL of a CSV export to fetch
    #[arg(long, env = "CFBFEED_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Local CSV file to read instead of fetching
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Google Sheets document id to fetch as CSV
    #[arg(long, value_name = "ID")]
    pub sheet_id: Option<String>,

    /// Sheet tab id used with --sheet-id (defaults to the first tab)
    #[arg(long, value_name = "GID")]
    pub gid: Option<String>,

    /// Seconds a fetched table is served before refreshing
    #[arg(long, env = "CFBFEED_FRESH_SECS", default_value_t = 300)]
    pub fresh_secs: u64,

    /// Seconds before an upstream request is abandoned
    #[arg(long, env = "CFBFEED_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Treat the first CSV row as data instead of a header
    #[arg(long)]
    pub no_skip_header: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Keep running and print the table every SECS seconds
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,
}

/// Where the sheet comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Url(String),
    File(PathBuf),
    Sheet { id: String, gid: String },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Upstream location
    pub source: SourceSpec,
    /// Cache and parsing settings
    pub feed: FeedConfig,
    /// Bound on each HTTP request
    pub timeout: Duration,
    /// Output format
    pub format: OutputFormat,
    /// Re-print interval, `None` for a single run
    pub watch: Option<Duration>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the source is missing or ambiguous, or an
    ///   interval is zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let source = match (&cli.url, &cli.file, &cli.sheet_id) {
            (Some(url), None, None) => SourceSpec::Url(url.clone()),
            (None, Some(path), None) => SourceSpec::File(path.clone()),
            (None, None, Some(id)) => SourceSpec::Sheet {
                id: id.clone(),
                gid: cli.gid.clone().unwrap_or_else(|| "0".to_string()),
            },
            (None, None, None) => return Err(CliError::NoSource),
            _ => return Err(CliError::ConflictingSources),
        };

        if cli.gid.is_some() && cli.sheet_id.is_none() {
            return Err(CliError::GidWithoutSheet);
        }

        if cli.timeout_secs == 0 {
            return Err(CliError::ZeroTimeout);
        }

        let watch = match cli.watch {
            Some(0) => return Err(CliError::ZeroWatchInterval),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(StartupConfig {
            source,
            feed: FeedConfig {
                freshness: Duration::from_secs(cli.fresh_secs),
                skip_header: !cli.no_skip_header,
            },
            timeout: Duration::from_secs(cli.timeout_secs),
            format: cli.format,
            watch,
        })
    }
}

/// Renders records in the requested format
pub fn render(records: &[Record], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let response = TableResponse::from(records.to_vec());
            serde_json::to_string_pretty(&response)
        }
        OutputFormat::Csv => Ok(to_csv(records)),
    }
}
