//! Cloud environment detection.

use std::time::Duration;

use tracing::{debug, info};

use crate::client::{MetadataClient, DEFAULT_BASE_URL, PROBE_TIMEOUT};
use crate::probe;

/// Decides whether the process runs on an EC2 instance with a reachable
/// instance metadata service.
///
/// # Example
///
/// ```ignore
/// use sqs_plugin::EnvironmentDetector;
///
/// #[tokio::main]
/// async fn main() -> Result<(), reqwest::Error> {
///     let inside_aws = EnvironmentDetector::new()?.detect().await;
///     println!("inside AWS: {}", inside_aws);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentDetector {
    client: MetadataClient,
}

impl EnvironmentDetector {
    /// Detector against `169.254.169.254` with a 2 second timeout per probe.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_options(DEFAULT_BASE_URL, PROBE_TIMEOUT)
    }

    /// Detector against a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::with_options(base_url, PROBE_TIMEOUT)
    }

    /// Detector with a custom base URL and per-probe timeout.
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: MetadataClient::new(timeout, base_url)?,
        })
    }

    /// Get the probe client.
    pub fn client(&self) -> &MetadataClient {
        &self.client
    }

    /// Probe IMDSv1, then IMDSv2 only if the first probe failed.
    ///
    /// Every failure (transport error, timeout, non-200) counts as "not in
    /// AWS"; there are no retries.
    pub async fn detect(&self) -> bool {
        let inside_aws = self.imds_v1().await || self.imds_v2().await;
        info!(inside_aws, base_url = self.client.base_url(), "environment detected");
        inside_aws
    }

    async fn imds_v1(&self) -> bool {
        match probe::instance_identity(&self.client).await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, path = probe::INSTANCE_IDENTITY_PATH, "IMDSv1 probe failed");
                false
            }
        }
    }

    async fn imds_v2(&self) -> bool {
        match probe::token(&self.client).await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, path = probe::TOKEN_PATH, "IMDSv2 probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detector() {
        let detector = EnvironmentDetector::new().unwrap();
        assert_eq!(detector.client().base_url(), DEFAULT_BASE_URL);
        assert_eq!(detector.client().timeout(), PROBE_TIMEOUT);
    }

    #[test]
    fn test_with_options() {
        let detector =
            EnvironmentDetector::with_options("http://localhost:1234/", Duration::from_millis(50))
                .unwrap();
        assert_eq!(detector.client().base_url(), "http://localhost:1234");
        assert_eq!(detector.client().timeout(), Duration::from_millis(50));
    }
}
