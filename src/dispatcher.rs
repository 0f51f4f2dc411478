//! The alert dispatcher: turns log events into SNS notifications.

use crate::client::{
    sns::SnsClientFactory, ClientFactory, Completion, NotificationClient, PublishOutput,
    PublishRequest, PUBLISH_OPERATION,
};
use crate::config::{AlertOptions, AlertSettings};
use crate::error::{ConfigurationError, PublishError};
use crate::template::{Metadata, MetadataFormat, Substitution};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, trace};

/// Name the dispatcher registers under.
pub const TRANSPORT_NAME: &str = "SNSIAMTransport";

/// Validated settings plus the client handle shared by every dispatch.
pub struct AlertDispatcher {
    settings: AlertSettings,
    client: Arc<dyn NotificationClient>,
}

impl AlertDispatcher {
    /// Creates a dispatcher publishing to AWS SNS.
    pub fn new(options: Option<AlertOptions>) -> Result<Self, ConfigurationError> {
        Self::with_factory(options, &SnsClientFactory)
    }

    /// Creates a dispatcher whose client comes from `factory`.
    ///
    /// Options are validated before anything else happens; on failure the
    /// factory is never called.
    pub fn with_factory(
        options: Option<AlertOptions>,
        factory: &dyn ClientFactory,
    ) -> Result<Self, ConfigurationError> {
        let settings = options.unwrap_or_default().into_settings()?;
        let client = factory.create(settings.credentials.clone(), &settings.region);

        info!(
            topic = %settings.topic_identifier,
            region = %settings.region,
            level = %settings.minimum_level,
            "Alert dispatcher ready."
        );

        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &AlertSettings {
        &self.settings
    }

    /// Renders the publish request for one event.
    pub fn render(&self, level: &str, message: &str, metadata: &Metadata) -> PublishRequest {
        let rendered_metadata =
            MetadataFormat::from_json_flag(self.settings.render_metadata_as_json).render(metadata);
        let substitution = Substitution {
            level,
            message,
            metadata: &rendered_metadata,
        };

        PublishRequest {
            destination_topic: self.settings.topic_identifier.clone(),
            subject: substitution.apply(&self.settings.subject_template),
            message: substitution.apply(&self.settings.message_template),
        }
    }

    /// Publishes one event and waits for the outcome.
    pub async fn publish(
        &self,
        level: &str,
        message: &str,
        metadata: &Metadata,
    ) -> Result<PublishOutput, PublishError> {
        let (tx, rx) = oneshot::channel();
        self.notify(
            level,
            message,
            metadata,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.await.unwrap_or(Err(PublishError::Dropped))
    }
}

impl Transport for AlertDispatcher {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    fn level(&self) -> &str {
        &self.settings.minimum_level
    }

    fn handle_exceptions(&self) -> bool {
        self.settings.capture_uncaught_exceptions
    }

    fn notify(&self, level: &str, message: &str, metadata: &Metadata, completion: Completion) {
        let request = self.render(level, message, metadata);
        trace!(subject = %request.subject, "Publishing alert.");
        self.client.call(PUBLISH_OPERATION, request, completion);
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("name", &TRANSPORT_NAME)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
