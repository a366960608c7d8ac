//! Plugin entry point: init hook and driver factory.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry_sdk::trace::SdkTracerProvider;
use tokio::runtime::Handle;
use tracing::{debug, Instrument};

use crate::config::Configurer;
use crate::detector::EnvironmentDetector;
use crate::error::PluginError;
use crate::jobs::{CommandSender, DriverArgs, DriverConstructor, Pipeline, Queue};
use crate::logger::{Logger, TracingLogger};
use crate::state::PluginState;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "sqs";

/// Capability exposing the process-wide tracing provider.
pub trait Tracer: Send + Sync {
    /// Get the tracing provider.
    fn tracer(&self) -> SdkTracerProvider;
}

/// SQS jobs plugin.
///
/// Detects on [`init`](PluginBuilder::init) whether it runs inside AWS and
/// builds drivers through `C` with that verdict.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use sqs_plugin::{JsonConfig, Plugin, TracingLogger};
///
/// let plugin = Plugin::builder(MyConstructor)
///     .logger(&TracingLogger)
///     .config(Arc::new(JsonConfig::from_path(".rr.json")?))
///     .tracer(None)
///     .init()?;
///
/// let driver = plugin
///     .driver_from_config("sqs", queue, pipeline, commands)
///     .await?;
/// ```
pub struct Plugin<C> {
    constructor: C,
    state: Arc<PluginState>,
}

/// Collects the collaborators for [`Plugin`].
pub struct PluginBuilder<'a, C> {
    constructor: C,
    logger: Option<&'a dyn Logger>,
    config: Option<Arc<dyn Configurer>>,
    tracer: Option<SdkTracerProvider>,
    detector: Option<EnvironmentDetector>,
}

impl<'a, C: DriverConstructor> PluginBuilder<'a, C> {
    /// Logging sink; defaults to [`TracingLogger`].
    pub fn logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Configuration reader; required.
    pub fn config(mut self, config: Arc<dyn Configurer>) -> Self {
        self.config = Some(config);
        self
    }

    /// Tracing capability resolved by the host; `None` disables tracing.
    pub fn tracer(mut self, tracer: Option<&dyn Tracer>) -> Self {
        self.tracer = tracer.map(|tracer| tracer.tracer());
        self
    }

    /// Override the environment detector (custom metadata address or timeout).
    pub fn detector(mut self, detector: EnvironmentDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Store collaborators and start environment detection in the background.
    ///
    /// Returns without waiting for detection. Must be called from within a
    /// tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::MissingConfig` without a configuration reader,
    /// `PluginError::NoRuntime` outside a runtime and `PluginError::Client`
    /// if the default detector cannot build its HTTP client.
    pub fn init(self) -> Result<Plugin<C>, PluginError> {
        let config = self.config.ok_or(PluginError::MissingConfig)?;
        let runtime = Handle::try_current().map_err(|_| PluginError::NoRuntime)?;
        let detector = match self.detector {
            Some(detector) => detector,
            None => EnvironmentDetector::new()?,
        };

        let logger = self
            .logger
            .unwrap_or(&TracingLogger)
            .named_logger(PLUGIN_NAME);
        let state = Arc::new(PluginState::new(logger.clone(), config, self.tracer));

        let detection = Arc::clone(&state);
        runtime.spawn(
            async move {
                let inside_aws = detector.detect().await;
                detection.set_inside_aws(inside_aws).await;
            }
            .instrument(logger),
        );

        Ok(Plugin {
            constructor: self.constructor,
            state,
        })
    }
}

impl<C: DriverConstructor> Plugin<C> {
    /// Start building a plugin around the driver constructor.
    pub fn builder<'a>(constructor: C) -> PluginBuilder<'a, C> {
        PluginBuilder {
            constructor,
            logger: None,
            config: None,
            tracer: None,
            detector: None,
        }
    }

    /// Get the plugin name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Current verdict; `false` while detection is still running.
    pub async fn inside_aws(&self) -> bool {
        self.state.inside_aws().await
    }

    /// Wait up to `timeout` for the detection verdict.
    pub async fn wait_ready(&self, timeout: Duration) -> Option<bool> {
        self.state.wait_ready(timeout).await
    }

    /// Get the shared plugin state (read-only access to the verdict).
    pub fn state(&self) -> &PluginState {
        &self.state
    }

    /// Build a driver whose queue settings live in the config section `config_key`.
    ///
    /// Constructor errors are returned as is.
    pub async fn driver_from_config(
        &self,
        config_key: &str,
        queue: Arc<dyn Queue>,
        pipeline: Pipeline,
        _commands: CommandSender,
    ) -> Result<C::Output, C::Error> {
        let args = self.driver_args(queue).await;
        debug!(
            parent: &args.logger,
            config_key,
            pipeline = pipeline.name(),
            inside_aws = args.inside_aws,
            "building driver from config"
        );
        self.constructor.from_config(config_key, pipeline, args).await
    }

    /// Build a driver whose queue settings are embedded in `pipeline`.
    ///
    /// Constructor errors are returned as is.
    pub async fn driver_from_pipeline(
        &self,
        pipeline: Pipeline,
        queue: Arc<dyn Queue>,
        _commands: CommandSender,
    ) -> Result<C::Output, C::Error> {
        let args = self.driver_args(queue).await;
        debug!(
            parent: &args.logger,
            pipeline = pipeline.name(),
            inside_aws = args.inside_aws,
            "building driver from pipeline"
        );
        self.constructor.from_pipeline(pipeline, args).await
    }

    // The read hold ends here; constructors may do network I/O.
    async fn driver_args(&self, queue: Arc<dyn Queue>) -> DriverArgs {
        let snapshot = self.state.snapshot().await;
        DriverArgs {
            tracer: snapshot.tracer,
            inside_aws: snapshot.inside_aws,
            logger: snapshot.logger,
            config: snapshot.config,
            queue,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::config::JsonConfig;
    use crate::jobs::Driver;

    struct NoopDriver;

    #[async_trait]
    impl Driver for NoopDriver {
        async fn run(
            &self,
            _pipeline: &Pipeline,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    struct NoopConstructor;

    #[async_trait]
    impl DriverConstructor for NoopConstructor {
        type Output = NoopDriver;
        type Error = String;

        async fn from_config(
            &self,
            _key: &str,
            _pipeline: Pipeline,
            _args: DriverArgs,
        ) -> Result<NoopDriver, String> {
            Ok(NoopDriver)
        }

        async fn from_pipeline(
            &self,
            _pipeline: Pipeline,
            _args: DriverArgs,
        ) -> Result<NoopDriver, String> {
            Ok(NoopDriver)
        }
    }

    #[test]
    fn test_init_requires_runtime() {
        let result = Plugin::builder(NoopConstructor)
            .config(Arc::new(JsonConfig::default()))
            .init();
        assert!(matches!(result, Err(PluginError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_init_requires_config() {
        let result = Plugin::builder(NoopConstructor).init();
        assert!(matches!(result, Err(PluginError::MissingConfig)));
    }

    #[tokio::test]
    async fn test_plugin_name() {
        let detector = EnvironmentDetector::with_options(
            "http://127.0.0.1:1",
            Duration::from_millis(10),
        )
        .unwrap();
        let plugin = Plugin::builder(NoopConstructor)
            .config(Arc::new(JsonConfig::default()))
            .detector(detector)
            .init()
            .unwrap();
        assert_eq!(plugin.name(), "sqs");
    }
}
