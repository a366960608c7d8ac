//! Shared plugin state guarded by a reader/writer lock.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry_sdk::trace::SdkTracerProvider;
use tokio::sync::{watch, RwLock};
use tracing::Span;

use crate::config::Configurer;

/// Detection verdict plus the collaborators every driver needs.
///
/// `inside_aws` starts out `false` and is written once, by the detection
/// task. Readers never wait for detection unless they ask to via
/// [`PluginState::wait_ready`].
pub struct PluginState {
    shared: RwLock<Shared>,
    ready: watch::Sender<bool>,
}

struct Shared {
    inside_aws: bool,
    tracer: Option<SdkTracerProvider>,
    logger: Span,
    config: Arc<dyn Configurer>,
}

/// Copy of the state taken under a single read hold.
#[derive(Clone)]
pub(crate) struct Snapshot {
    pub inside_aws: bool,
    pub tracer: Option<SdkTracerProvider>,
    pub logger: Span,
    pub config: Arc<dyn Configurer>,
}

impl PluginState {
    /// Create the state with the verdict pending and defaulted to `false`.
    pub(crate) fn new(
        logger: Span,
        config: Arc<dyn Configurer>,
        tracer: Option<SdkTracerProvider>,
    ) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            shared: RwLock::new(Shared {
                inside_aws: false,
                tracer,
                logger,
                config,
            }),
            ready,
        }
    }

    /// Record the detection verdict and wake everyone in [`wait_ready`](Self::wait_ready).
    ///
    /// Only the first call has an effect.
    pub(crate) async fn set_inside_aws(&self, inside_aws: bool) {
        let mut shared = self.shared.write().await;
        if *self.ready.borrow() {
            return;
        }
        shared.inside_aws = inside_aws;
        // Flip the signal while still holding the write guard.
        self.ready.send_replace(true);
    }

    /// Current verdict; `false` until detection has finished.
    pub async fn inside_aws(&self) -> bool {
        self.shared.read().await.inside_aws
    }

    /// Whether detection has finished.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait up to `timeout` for detection to finish.
    ///
    /// Returns `None` if the verdict is still pending when the timeout elapses.
    pub async fn wait_ready(&self, timeout: Duration) -> Option<bool> {
        let mut ready = self.ready.subscribe();
        let done = matches!(
            tokio::time::timeout(timeout, ready.wait_for(|ready| *ready)).await,
            Ok(Ok(_))
        );
        if done {
            Some(self.inside_aws().await)
        } else {
            None
        }
    }

    pub(crate) async fn snapshot(&self) -> Snapshot {
        let shared = self.shared.read().await;
        Snapshot {
            inside_aws: shared.inside_aws,
            tracer: shared.tracer.clone(),
            logger: shared.logger.clone(),
            config: Arc::clone(&shared.config),
        }
    }
}
