//! Panic hooks are process-wide, so this binary holds a single test.

mod helpers;

use helpers::mock_client::MockFactory;
use sns_alert::{AlertDispatcher, AlertLayer, AlertOptions};
use std::sync::Arc;

#[test]
fn test_panics_are_published_when_capture_enabled() {
    let factory = MockFactory::default();
    let options = AlertOptions {
        capture_uncaught_exceptions: Some(true),
        message_template: Some("%l: %e | %m".to_string()),
        render_metadata_as_json: Some(true),
        ..AlertOptions::for_topic("arn:topic")
    };
    let dispatcher = Arc::new(AlertDispatcher::with_factory(Some(options), &factory).unwrap());
    let _layer = AlertLayer::register(dispatcher).unwrap();

    let result = std::thread::Builder::new()
        .name("worker-7".to_string())
        .spawn(|| panic!("kaboom {}", 7))
        .unwrap()
        .join();
    assert!(result.is_err());

    let requests = factory.client.requests();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].1.message;
    assert!(body.starts_with("error: kaboom 7 | "), "unexpected body: {}", body);

    let metadata: serde_json::Value =
        serde_json::from_str(body.split(" | ").nth(1).unwrap()).unwrap();
    assert_eq!(metadata["thread"], "worker-7");
    assert!(metadata["location"]
        .as_str()
        .unwrap()
        .contains("panic_capture.rs"));
}
