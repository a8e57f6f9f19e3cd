//! Upstream table sources
//!
//! A `TableSource` produces the raw CSV text for one refresh. The HTTP source
//! talks to a published sheet; the file source reads a local export.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Default bound on a single upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with sheet requests
const USER_AGENT: &str = concat!("cfbfeed/", env!("CARGO_PKG_VERSION"));

/// Failure to obtain the raw table text
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error, timeout or unreadable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Local source could not be read
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Something that can produce CSV text on demand
pub trait TableSource: Send + Sync {
    /// Fetches the full CSV body; one attempt, no retries
    fn fetch_text(&self) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Human-readable location, used in logs
    fn location(&self) -> String;
}

/// Builds the CSV export URL for a Google Sheets tab
pub fn google_sheet_csv_url(sheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        sheet_id, gid
    )
}

/// Fetches CSV over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// HTTP client with the request timeout applied
    client: Client,
    /// Location of the CSV
    url: String,
}

impl HttpSource {
    /// Creates a source for `url` whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Creates a source with a caller-supplied HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Creates a source for one tab of a Google Sheet
    pub fn google_sheet(sheet_id: &str, gid: &str, timeout: Duration) -> Result<Self, TransportError> {
        Self::new(google_sheet_csv_url(sheet_id, gid), timeout)
    }

    /// The URL this source fetches
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TableSource for HttpSource {
    async fn fetch_text(&self) -> Result<String, TransportError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        debug!(url = %self.url, bytes = text.len(), "fetched sheet");
        Ok(text)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Reads CSV from a local file on every refresh
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileSource {
    async fn fetch_text(&self) -> Result<String, TransportError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), bytes = text.len(), "read sheet file");
        Ok(text)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
