//! Environment detection and driver factory for an SQS jobs plugin.
//!
//! On init the plugin probes the EC2 instance metadata service in the
//! background to learn whether it runs inside AWS. Drivers built afterwards
//! receive that verdict together with the configuration reader, named logger
//! and optional tracing provider.
//!
//! # Features
//!
//! - Non-blocking detection over IMDSv1, falling back to the IMDSv2 token handshake
//! - Reader/writer guarded state with an optional wait-for-verdict signal
//! - Driver construction by config key or by pipeline descriptor
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sqs_plugin::{JsonConfig, Plugin, PluginError, TracingLogger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PluginError> {
//!     let plugin = Plugin::builder(MyConstructor)
//!         .logger(&TracingLogger)
//!         .config(Arc::new(JsonConfig::default()))
//!         .init()?;
//!
//!     // Read the verdict now, or wait a bounded time for detection.
//!     let now = plugin.inside_aws().await;
//!     let settled = plugin.wait_ready(Duration::from_secs(5)).await;
//!     Ok(())
//! }
//! ```
//!
//! # Metadata Probes
//!
//! | Generation | Request | Header | Success |
//! |------------|---------|--------|---------|
//! | IMDSv1 | `GET /latest/dynamic/instance-identity/` | - | 200 |
//! | IMDSv2 | `PUT /latest/api/token` | `X-aws-ec2-metadata-token-ttl-seconds: 10` | 200 |

mod client;
mod config;
mod detector;
mod error;
mod jobs;
mod logger;
mod plugin;
mod probe;
mod state;

pub use client::{MetadataClient, DEFAULT_BASE_URL, PROBE_TIMEOUT};
pub use config::{Configurer, JsonConfig};
pub use detector::EnvironmentDetector;
pub use error::{ConfigError, DetectError, PluginError};
pub use jobs::{
    Command, CommandSender, Driver, DriverArgs, DriverConstructor, Pipeline, Queue, QueueItem,
    DEFAULT_PRIORITY,
};
pub use logger::{Logger, TracingLogger};
pub use plugin::{Plugin, PluginBuilder, Tracer, PLUGIN_NAME};
pub use probe::{INSTANCE_IDENTITY_PATH, TOKEN_PATH, TOKEN_TTL_HEADER};
pub use state::PluginState;
