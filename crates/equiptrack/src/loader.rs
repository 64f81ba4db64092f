//! Seed data loading.
//!
//! The seed document is fetched once at startup from a [`SeedSource`]. This
//! is the only asynchronous step in equiptrack; it ends in one of the three
//! [`LoadState`]s and is never retried.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::json_type_name;

/// Key of the wrapped array in `{"data": [...]}` documents.
const DATA_KEY: &str = "data";

/// Outcome of the seed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// The load has not finished yet.
    #[default]
    Pending,
    /// The collection was seeded.
    Ready,
    /// The load failed; the message is shown as is.
    Failed(String),
}

impl LoadState {
    /// Whether the load is still running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Failure message, if the load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Where the seed document comes from.
#[async_trait::async_trait]
pub trait SeedSource: fmt::Debug + Send + Sync {
    /// Human-readable location, for logs and error messages.
    fn describe(&self) -> String;

    /// Fetch the raw document.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is unreachable or answers with a
    /// non-success status.
    async fn fetch(&self) -> Result<String>;
}

/// Seed document on the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path that will be read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SeedSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        debug!(path = %self.path.display(), "Reading seed file");
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// Seed document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source fetching `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl SeedSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, "Fetching seed document");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::load_failure(format!("HTTP error: {}", status.as_u16())));
        }
        Ok(response.text().await?)
    }
}

/// Pick a source for a configured location: URLs go over HTTP, anything
/// else is a file path.
///
/// # Errors
///
/// Returns an error if an HTTP client is needed and cannot be built.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn SeedSource>> {
    let is_url = location.starts_with("http://") || location.starts_with("https://");
    if is_url {
        Ok(Box::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Parse a seed document and reduce it to what the store accepts.
///
/// Arrays pass through, `{"data": [...]}` is unwrapped, any other object is
/// returned as a single record.
///
/// # Errors
///
/// Returns [`Error::Json`] for malformed JSON and
/// [`Error::InvalidDataShape`] for scalars.
pub fn parse_seed(text: &str) -> Result<Value> {
    let document: Value = serde_json::from_str(text)?;
    match document {
        Value::Array(_) => Ok(document),
        Value::Object(mut object) => {
            if matches!(object.get(DATA_KEY), Some(Value::Array(_))) {
                if let Some(data) = object.remove(DATA_KEY) {
                    return Ok(data);
                }
            }
            Ok(Value::Object(object))
        }
        other => Err(Error::InvalidDataShape {
            found: json_type_name(&other),
        }),
    }
}

/// Fetch and parse the seed document.
///
/// # Errors
///
/// Returns any fetch or parse error; see [`SeedSource::fetch`] and
/// [`parse_seed`].
pub async fn load_seed(source: &dyn SeedSource) -> Result<Value> {
    let text = source.fetch().await?;
    let seed = parse_seed(&text)?;
    info!(source = %source.describe(), "Seed document fetched");
    Ok(seed)
}
