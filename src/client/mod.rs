//! Notification-publishing clients.
//!
//! The dispatcher talks to a [`NotificationClient`] through a callback-style
//! `call`, handing over the completion it was given. [`SpawningClient`] adapts
//! any async [`Publisher`] to that contract by running each publish as its own
//! tokio task, so callers never block and concurrent publishes never wait on
//! each other. Calls made outside any runtime run on a small runtime owned by
//! this module, started on first need.
pub mod sns;

use crate::config::Credentials;
use crate::error::PublishError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, instrument};

/// Name of the only operation the adapter invokes.
pub const PUBLISH_OPERATION: &str = "Publish";

/// The request fields of a publish call, named as the service expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "TopicArn")]
    pub destination_topic: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Message")]
    pub message: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutput {
    /// Identifier assigned by the service, when it reports one.
    pub message_id: Option<String>,
}

/// Receives the outcome of exactly one publish attempt.
pub type Completion = Box<dyn FnOnce(Result<PublishOutput, PublishError>) + Send + 'static>;

/// A client able to run service operations without blocking the caller.
pub trait NotificationClient: Send + Sync {
    /// Starts `operation` with `request` and invokes `completion` once the
    /// outcome is known.
    fn call(&self, operation: &str, request: PublishRequest, completion: Completion);
}

/// Builds the client handle a dispatcher holds for its whole lifetime.
pub trait ClientFactory {
    /// Creating a client never fails; absent credentials select the ambient
    /// credential chain.
    fn create(&self, credentials: Credentials, region: &str) -> Arc<dyn NotificationClient>;
}

/// Performs a single publish against the notification service.
#[async_trait]
pub trait Publisher: Send + Sync + 'static {
    async fn publish(&self, request: PublishRequest) -> Result<PublishOutput, PublishError>;
}

const FALLBACK_THREAD_NAME: &str = "sns-alert-publish";

static FALLBACK_RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();

/// Runtime for publishes started where no tokio runtime is reachable.
fn fallback_runtime() -> Option<Handle> {
    FALLBACK_RUNTIME
        .get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name(FALLBACK_THREAD_NAME)
                .enable_all()
                .build()
                .ok()
        })
        .as_ref()
        .map(|runtime| runtime.handle().clone())
}

/// Runs each call of an async [`Publisher`] on its own tokio task.
pub struct SpawningClient<P: Publisher> {
    publisher: Arc<P>,
    runtime: Option<Handle>,
}

impl<P: Publisher> SpawningClient<P> {
    /// Creates a new `SpawningClient`. The current runtime, if any, is kept for
    /// calls made from outside a runtime; without one those calls use the
    /// module's own runtime.
    pub fn new(publisher: P) -> Self {
        Self {
            publisher: Arc::new(publisher),
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publisher> NotificationClient for SpawningClient<P> {
    #[instrument(skip(self, request, completion), fields(topic = %request.destination_topic))]
    fn call(&self, operation: &str, request: PublishRequest, completion: Completion) {
        if operation != PUBLISH_OPERATION {
            completion(Err(PublishError::UnsupportedOperation(operation.to_string())));
            return;
        }

        let handle = match Handle::try_current()
            .ok()
            .or_else(|| self.runtime.clone())
            .or_else(fallback_runtime)
        {
            Some(handle) => handle,
            None => {
                completion(Err(PublishError::NoRuntime));
                return;
            }
        };

        debug!("Spawning publish task.");
        let publisher = self.publisher.clone();
        handle.spawn(async move {
            let result = publisher.publish(request).await;
            completion(result);
        });
    }
}
