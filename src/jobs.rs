//! Contracts shared with the jobs host and the SQS driver.

use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry_sdk::trace::SdkTracerProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::Span;

use crate::config::Configurer;

/// Pipeline key holding the pipeline name.
const NAME_KEY: &str = "name";

/// Pipeline key holding the driver name.
const DRIVER_KEY: &str = "driver";

/// Pipeline key holding the pipeline priority.
const PRIORITY_KEY: &str = "priority";

/// Priority used when a pipeline does not declare one.
pub const DEFAULT_PRIORITY: i64 = 10;

/// One configured job-processing route.
///
/// # Example
///
/// ```ignore
/// use sqs_plugin::Pipeline;
///
/// let pipeline = Pipeline::new("test-1", "sqs").with("prefetch", 10);
/// assert_eq!(pipeline.int("prefetch", 1), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pipeline(Map<String, Value>);

impl Pipeline {
    /// Create a pipeline with a name and driver.
    pub fn new(name: &str, driver: &str) -> Self {
        let mut values = Map::new();
        values.insert(NAME_KEY.to_string(), Value::from(name));
        values.insert(DRIVER_KEY.to_string(), Value::from(driver));
        Self(values)
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Get the pipeline name, empty if unset.
    pub fn name(&self) -> &str {
        self.string_ref(NAME_KEY).unwrap_or_default()
    }

    /// Get the driver name, empty if unset.
    pub fn driver(&self) -> &str {
        self.string_ref(DRIVER_KEY).unwrap_or_default()
    }

    /// Get the pipeline priority, [`DEFAULT_PRIORITY`] if unset.
    pub fn priority(&self) -> i64 {
        self.int(PRIORITY_KEY, DEFAULT_PRIORITY)
    }

    /// Whether `key` is set.
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, or `default` when missing or not a string.
    pub fn string(&self, key: &str, default: &str) -> String {
        self.string_ref(key).unwrap_or(default).to_string()
    }

    /// Integer value of `key`. Numeric strings are accepted.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Boolean value of `key`. `"true"` / `"false"` strings are accepted.
    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    fn string_ref(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// A single job held by the priority queue.
pub trait QueueItem: Send + Sync {
    fn id(&self) -> &str;
    fn priority(&self) -> i64;
    fn body(&self) -> &[u8];
}

/// Priority queue the driver pushes received jobs into.
pub trait Queue: Send + Sync {
    fn insert(&self, item: Box<dyn QueueItem>);
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Commands a driver may send back to the jobs host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stop { pipeline: String },
    Restart { pipeline: String },
}

/// Write side of the host command channel.
pub type CommandSender = UnboundedSender<Command>;

/// A running queue driver. Implemented outside this crate.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Start consuming the pipeline.
    async fn run(&self, pipeline: &Pipeline) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Stop consuming and release resources.
    async fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Everything handed to the driver constructor.
///
/// The configuration reader is consulted by the constructor itself; this
/// crate does not interpret queue settings.
#[derive(Clone)]
pub struct DriverArgs {
    /// `None` when no tracing provider was registered.
    pub tracer: Option<SdkTracerProvider>,
    /// Whether the process runs on EC2 with a reachable metadata service.
    pub inside_aws: bool,
    pub logger: Span,
    pub config: Arc<dyn Configurer>,
    pub queue: Arc<dyn Queue>,
}

impl std::fmt::Debug for DriverArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverArgs")
            .field("tracer", &self.tracer.is_some())
            .field("inside_aws", &self.inside_aws)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

/// Builds SQS drivers. Implemented by the driver crate.
#[async_trait]
pub trait DriverConstructor: Send + Sync {
    type Output: Driver;
    type Error: Send;

    /// Build a driver whose settings live in the config section `key`.
    async fn from_config(
        &self,
        key: &str,
        pipeline: Pipeline,
        args: DriverArgs,
    ) -> Result<Self::Output, Self::Error>;

    /// Build a driver whose settings are embedded in `pipeline`.
    async fn from_pipeline(
        &self,
        pipeline: Pipeline,
        args: DriverArgs,
    ) -> Result<Self::Output, Self::Error>;
}
