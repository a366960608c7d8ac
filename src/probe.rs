//! EC2 instance metadata probes (IMDSv1 and IMDSv2).
//!
//! Both probes only check reachability: the response body is discarded and
//! the IMDSv2 token is never used.

use reqwest::StatusCode;

use crate::client::MetadataClient;
use crate::error::DetectError;

/// IMDSv1 instance identity path.
// https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/identify_ec2_instances.html
pub const INSTANCE_IDENTITY_PATH: &str = "/latest/dynamic/instance-identity/";

/// IMDSv2 token endpoint path.
// https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/configuring-instance-metadata-service.html
pub const TOKEN_PATH: &str = "/latest/api/token";

/// Token TTL header name.
pub const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";

/// Requested token TTL; only long enough to check the handshake.
pub const TOKEN_TTL_SECONDS: &str = "10";

/// Probe the IMDSv1 instance identity document.
pub async fn instance_identity(client: &MetadataClient) -> Result<(), DetectError> {
    let url = client.url(INSTANCE_IDENTITY_PATH);

    let response = client.inner().get(&url).send().await?;

    check_status(response.status())
}

/// Probe the IMDSv2 session token endpoint.
pub async fn token(client: &MetadataClient) -> Result<(), DetectError> {
    let url = client.url(TOKEN_PATH);

    let response = client
        .inner()
        .put(&url)
        .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
        .send()
        .await?;

    check_status(response.status())
}

fn check_status(status: StatusCode) -> Result<(), DetectError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(DetectError::Status(status.as_u16()))
    }
}
