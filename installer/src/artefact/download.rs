//! Streaming artefact downloads.
//!
//! Provides a trait-based abstraction for opening a remote archive as a
//! byte stream, enabling dependency injection for testing. The HTTP
//! implementation never buffers the body to disk.

use std::io::Read;
use std::time::Duration;

/// Default network timeout for a single repository attempt.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for opening remote archives as readable streams.
///
/// Abstractions allow tests to serve archives without network access.
///
/// # Examples
///
/// ```
/// use unaar::artefact::download::HttpSource;
///
/// let source = HttpSource::default();
/// // Use source.open("https://repo.maven.apache.org/maven2/...") in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactSource {
    /// Open `url` and return its body as a stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the server answers with
    /// a non-success status.
    fn open(&self, url: &str) -> Result<Box<dyn Read>, DownloadError>;
}

/// Errors arising from opening a remote archive.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// HTTP-based source using a blocking `ureq` agent.
#[derive(Clone)]
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    /// Create a source whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DOWNLOAD_TIMEOUT)
    }
}

impl ArtefactSource for HttpSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read>, DownloadError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(Box::new(response.into_body().into_reader()))
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
