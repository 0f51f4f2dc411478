//! Routes panics to a transport as `error` notifications.

use crate::template::Metadata;
use crate::transport::Transport;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

pub const PANIC_LEVEL: &str = "error";

/// Installs a panic hook that notifies `transport` and then runs the hook
/// that was previously installed.
pub fn install<T: Transport>(transport: Arc<T>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = panic_message(info.payload());

        let mut metadata = Metadata::new();
        if let Some(location) = info.location() {
            metadata.insert(
                "location".to_string(),
                Value::from(format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                )),
            );
        }
        let thread = std::thread::current();
        metadata.insert(
            "thread".to_string(),
            Value::from(thread.name().unwrap_or("<unnamed>")),
        );

        transport.notify(PANIC_LEVEL, &message, &metadata, Box::new(|_| {}));
        previous(info);
    }));
}

/// Extracts the text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
