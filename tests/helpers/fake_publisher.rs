//! A fake async publisher whose behaviour is chosen by the request subject.

use async_trait::async_trait;
use sns_alert::{ClientFactory, Credentials, NotificationClient, PublishError, PublishOutput, PublishRequest, Publisher, SpawningClient};
use std::sync::Arc;
use tokio::sync::Notify;

/// Subjects starting with `slow` wait for `release`, subjects starting with
/// `fail` are rejected, everything else succeeds at once.
#[derive(Clone, Default)]
pub struct FakePublisher {
    pub release: Arc<Notify>,
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, request: PublishRequest) -> Result<PublishOutput, PublishError> {
        if request.subject.starts_with("slow") {
            self.release.notified().await;
        }
        if request.subject.starts_with("fail") {
            return Err(PublishError::Service("AuthorizationError".to_string()));
        }
        Ok(PublishOutput {
            message_id: Some(request.subject),
        })
    }
}

pub struct FakePublisherFactory(pub FakePublisher);

impl ClientFactory for FakePublisherFactory {
    fn create(&self, _credentials: Credentials, _region: &str) -> Arc<dyn NotificationClient> {
        Arc::new(SpawningClient::new(self.0.clone()))
    }
}
