//! Fetch-refresh orchestration
//!
//! `TableFeed` decides whether to answer from cache or refresh from the
//! upstream source, and falls back to the last good table when a refresh
//! fails. Only a failure with nothing cached reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{TableCache, DEFAULT_FRESHNESS};
use crate::clock::{Clock, SystemClock};
use crate::data::{normalize, tokenize, Record, TableResponse, TableSource, TransportError};

/// Errors surfaced by `TableFeed`
#[derive(Debug, Error)]
pub enum FeedError {
    /// Refresh failed and no table has ever been cached
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] TransportError),
}

/// Pipeline settings
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// How long a refreshed table is served without hitting upstream
    pub freshness: Duration,
    /// Whether the first CSV row is a header to discard
    pub skip_header: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            freshness: DEFAULT_FRESHNESS,
            skip_header: true,
        }
    }
}

/// Serves normalized records from a source, caching between refreshes
pub struct TableFeed<S> {
    source: S,
    cache: TableCache<Vec<Record>>,
    skip_header: bool,
}

impl<S: TableSource> TableFeed<S> {
    /// Creates a feed over `source` using wall-clock time
    pub fn new(source: S, config: FeedConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// Creates a feed with an explicit time source
    pub fn with_clock(source: S, config: FeedConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: TableCache::new(config.freshness, clock),
            skip_header: config.skip_header,
        }
    }

    /// Returns the current table
    ///
    /// # Returns
    /// * `Ok(records)` - Fresh cache, a successful refresh, or stale cache
    ///   after a failed refresh
    /// * `Err(FeedError::UpstreamUnavailable)` - Refresh failed and nothing
    ///   has ever been cached
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without touching the source
    /// - Otherwise exactly one fetch is attempted
    /// - Any successful fetch replaces the cache, even if it yields no rows
    pub async fn get_table(&self) -> Result<Vec<Record>, FeedError> {
        if self.cache.is_fresh() {
            if let Some(entry) = self.cache.get() {
                debug!(records = entry.data.len(), "serving fresh cache");
                return Ok(entry.data.clone());
            }
        }

        match self.refresh().await {
            Ok(records) => {
                info!(
                    source = %self.source.location(),
                    records = records.len(),
                    "refreshed table"
                );
                self.cache.put(records.clone());
                Ok(records)
            }
            Err(error) => match self.cache.get() {
                Some(entry) => {
                    warn!(
                        source = %self.source.location(),
                        %error,
                        cached_at = %entry.cached_at,
                        "refresh failed, serving stale table"
                    );
                    Ok(entry.data.clone())
                }
                None => {
                    warn!(
                        source = %self.source.location(),
                        %error,
                        "refresh failed with empty cache"
                    );
                    Err(FeedError::UpstreamUnavailable(error))
                }
            },
        }
    }

    /// Same as `get_table`, wrapped in the `{ data }` response shape
    pub async fn get_response(&self) -> Result<TableResponse, FeedError> {
        self.get_table().await.map(TableResponse::from)
    }

    /// When the cached table was last refreshed, if ever
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.cache.get().map(|entry| entry.cached_at)
    }

    /// Whether the next `get_table` would be answered from cache
    pub fn is_fresh(&self) -> bool {
        self.cache.is_fresh()
    }

    /// The source this feed refreshes from
    pub fn source(&self) -> &S {
        &self.source
    }

    async fn refresh(&self) -> Result<Vec<Record>, TransportError> {
        let text = self.source.fetch_text().await?;
        let table = tokenize(&text);
        Ok(normalize(&table, self.skip_header))
    }
}
