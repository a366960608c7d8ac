//! HTTP client wrapper for metadata probes.

use std::time::Duration;

use reqwest::Client;

/// Timeout for a single metadata probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Metadata service base URL (link-local address).
pub const DEFAULT_BASE_URL: &str = "http://169.254.169.254";

/// HTTP client wrapper for metadata service requests.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    inner: Client,
    base_url: String,
    timeout: Duration,
}

impl MetadataClient {
    /// Create a new metadata client with the specified timeout and base URL.
    pub fn new(timeout: Duration, base_url: &str) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a probe client against the real metadata address.
    pub fn for_detection() -> Result<Self, reqwest::Error> {
        Self::new(PROBE_TIMEOUT, DEFAULT_BASE_URL)
    }

    /// Create a probe client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::new(PROBE_TIMEOUT, base_url)
    }

    /// Build the absolute URL for a metadata path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
