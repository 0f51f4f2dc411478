//! AWS SNS publisher built on `aws-sdk-sns`.

use super::{ClientFactory, NotificationClient, PublishOutput, PublishRequest, Publisher, SpawningClient};
use crate::config::Credentials;
use crate::error::PublishError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

const CREDENTIALS_PROVIDER_NAME: &str = "sns-alert-static";

/// Publishes to SNS. The SDK client is loaded on first use, since resolving
/// the ambient credential chain is asynchronous.
pub struct SnsPublisher {
    credentials: Credentials,
    region: String,
    client: OnceCell<aws_sdk_sns::Client>,
}

impl SnsPublisher {
    /// Creates a new `SnsPublisher`. Nothing is contacted until the first publish.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            client: OnceCell::new(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    async fn client(&self) -> &aws_sdk_sns::Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(self.region.clone()));

                if let Some((access_key_id, secret_access_key)) = self.credentials.static_pair() {
                    debug!(region = %self.region, "Loading SNS client with static credentials.");
                    loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                        access_key_id,
                        secret_access_key,
                        self.credentials.session_token.clone(),
                        None,
                        CREDENTIALS_PROVIDER_NAME,
                    ));
                } else {
                    debug!(region = %self.region, "Loading SNS client with ambient credentials.");
                }

                let sdk_config = loader.load().await;
                aws_sdk_sns::Client::new(&sdk_config)
            })
            .await
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    #[instrument(skip_all, fields(topic = %request.destination_topic))]
    async fn publish(&self, request: PublishRequest) -> Result<PublishOutput, PublishError> {
        let output = self
            .client()
            .await
            .publish()
            .topic_arn(request.destination_topic)
            .subject(request.subject)
            .message(request.message)
            .send()
            .await
            .map_err(|e| PublishError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(PublishOutput {
            message_id: output.message_id().map(str::to_string),
        })
    }
}

/// Default factory: SNS publishing through a [`SpawningClient`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsClientFactory;

impl ClientFactory for SnsClientFactory {
    fn create(&self, credentials: Credentials, region: &str) -> Arc<dyn NotificationClient> {
        Arc::new(SpawningClient::new(SnsPublisher::new(credentials, region)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_client_without_credentials() {
        // Must not need a runtime, credentials or network access.
        let _client = SnsClientFactory.create(Credentials::default(), "us-east-1");
    }

    #[test]
    fn test_publisher_is_lazy() {
        let publisher = SnsPublisher::new(Credentials::default(), "eu-central-1");
        assert_eq!(publisher.region(), "eu-central-1");
        assert!(publisher.client.get().is_none());
    }
}
