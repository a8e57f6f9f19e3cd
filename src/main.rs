//! cfbfeed - print college-football sheet data as JSON or CSV
//!
//! Builds a `TableFeed` from command-line configuration and prints the table
//! once, or keeps printing it on an interval with `--watch`.

use std::error::Error;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cfbfeed::cli::{render, Cli, OutputFormat, SourceSpec, StartupConfig};
use cfbfeed::data::{FileSource, HttpSource, TableSource};
use cfbfeed::TableFeed;

/// Sends log output to stderr so stdout stays machine-readable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Fetches once and prints the table
async fn run_once<S: TableSource>(
    feed: &TableFeed<S>,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let records = feed.get_table().await?;
    println!("{}", render(&records, format)?.trim_end());
    Ok(())
}

/// Prints the table every `every` until Ctrl-C
async fn run_watch<S: TableSource>(
    feed: &TableFeed<S>,
    every: Duration,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let mut interval = tokio::time::interval(every);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match feed.get_table().await {
                    Ok(records) => {
                        if let Some(cached_at) = feed.last_refreshed() {
                            info!(%cached_at, fresh = feed.is_fresh(), "table ready");
                        }
                        println!("{}", render(&records, format)?.trim_end());
                    }
                    // Keep polling; the source may come back
                    Err(e) => warn!(error = %e, "no table available yet"),
                }
            }
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

async fn run<S: TableSource>(source: S, config: &StartupConfig) -> Result<(), Box<dyn Error>> {
    info!(source = %source.location(), "starting feed");
    let feed = TableFeed::new(source, config.feed.clone());

    match config.watch {
        Some(every) => run_watch(&feed, every, config.format).await,
        None => run_once(&feed, config.format).await,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let result = match &config.source {
        SourceSpec::Url(url) => run(HttpSource::new(url.clone(), config.timeout)?, &config).await,
        SourceSpec::Sheet { id, gid } => {
            run(HttpSource::google_sheet(id, gid, config.timeout)?, &config).await
        }
        SourceSpec::File(path) => run(FileSource::new(path.clone()), &config).await,
    };

    if let Err(e) = result {
        error!(error = %e, "feed failed");
        eprintln!("error: {}", e);
        process::exit(1);
    }

    Ok(())
}
