#![allow(dead_code)]
pub mod fake_publisher;
pub mod mock_client;

use serde_json::Value;
use sns_alert::Metadata;

/// Builds metadata from a `json!` object literal.
pub fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        other => panic!("metadata must be a JSON object, got {}", other),
    }
}
