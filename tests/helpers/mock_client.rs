//! A mock notification client that records calls instead of publishing.

use sns_alert::{ClientFactory, Completion, Credentials, NotificationClient, PublishRequest};
use std::sync::{Arc, Mutex};

/// One recorded `call`, including the completion it was handed.
pub struct RecordedCall {
    pub operation: String,
    pub request: PublishRequest,
    pub completion: Option<Completion>,
}

/// Records every call and keeps the completion so the test decides when,
/// and with what, it is invoked.
#[derive(Clone, Default)]
pub struct MockClient {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockClient {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, PublishRequest)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| (c.operation.clone(), c.request.clone()))
            .collect()
    }

    /// Takes the completion handed over by the `index`th call.
    pub fn take_completion(&self, index: usize) -> Completion {
        self.calls.lock().unwrap()[index]
            .completion
            .take()
            .expect("completion already taken")
    }
}

impl NotificationClient for MockClient {
    fn call(&self, operation: &str, request: PublishRequest, completion: Completion) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: operation.to_string(),
            request,
            completion: Some(completion),
        });
    }
}

/// A factory that hands out a shared [`MockClient`] and records its inputs.
#[derive(Clone, Default)]
pub struct MockFactory {
    pub client: MockClient,
    pub created: Arc<Mutex<Vec<(Credentials, String)>>>,
}

impl ClientFactory for MockFactory {
    fn create(&self, credentials: Credentials, region: &str) -> Arc<dyn NotificationClient> {
        self.created
            .lock()
            .unwrap()
            .push((credentials, region.to_string()));
        Arc::new(self.client.clone())
    }
}
