//! Error types for the SQS jobs plugin.

use thiserror::Error;

/// Errors returned while initializing the plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Init was called without a configuration reader.
    #[error("configuration reader is not set")]
    MissingConfig,

    /// Init was called outside of a tokio runtime.
    #[error("no tokio runtime available to spawn environment detection")]
    NoRuntime,

    /// The metadata HTTP client could not be built.
    #[error("metadata client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Why a single metadata probe did not succeed.
///
/// Never surfaced by [`EnvironmentDetector::detect`](crate::EnvironmentDetector::detect),
/// which folds every failure into `false`.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Metadata service answered with something other than 200.
    #[error("http {0}")]
    Status(u16),

    /// HTTP request error.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for DetectError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DetectError::Timeout
        } else {
            DetectError::Request(err)
        }
    }
}

/// Errors produced by the JSON-backed configuration reader.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested section does not exist.
    #[error("config section not found: {0}")]
    NotFound(String),

    /// JSON (de)serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
