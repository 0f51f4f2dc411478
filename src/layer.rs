//! A `tracing` layer that forwards qualifying events to a [`Transport`].
//!
//! The application builds its transport, then registers it explicitly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use sns_alert::{AlertDispatcher, AlertLayer, AlertOptions};
//! use tracing_subscriber::prelude::*;
//!
//! let dispatcher = Arc::new(AlertDispatcher::new(Some(AlertOptions::for_topic("arn:aws:sns:us-east-1:1:ops")))?);
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(AlertLayer::register(dispatcher)?)
//!     .init();
//! # Ok::<(), sns_alert::ConfigurationError>(())
//! ```
//!
//! No tokio runtime is required: publishes triggered from threads outside a
//! runtime run on a small runtime owned by the client.

use crate::client::{Completion, PublishOutput};
use crate::error::{ConfigurationError, PublishError};
use crate::panic_hook;
use crate::template::Metadata;
use crate::transport::Transport;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};

/// Crates whose events are never forwarded. Publishing may itself emit events
/// from these, and forwarding them would loop.
const SUPPRESSED_CRATES: &[&str] = &[
    env!("CARGO_CRATE_NAME"),
    "aws_config",
    "aws_credential_types",
    "aws_runtime",
    "aws_sigv4",
    "aws_types",
    "h2",
    "hyper",
    "hyper_rustls",
    "hyper_util",
    "rustls",
    "tower",
];

/// Crate-name prefixes of SDK crate families, matched against the crate name
/// only.
const SUPPRESSED_CRATE_FAMILIES: &[&str] = &["aws_sdk_", "aws_smithy_"];

/// Receives the outcome of every publish the layer starts.
pub type OutcomeHook = Arc<dyn Fn(Result<PublishOutput, PublishError>) + Send + Sync>;

const MESSAGE_FIELD: &str = "message";

/// Forwards events at or above the transport's level.
pub struct AlertLayer<T: Transport> {
    transport: Arc<T>,
    level: LevelFilter,
    on_outcome: Option<OutcomeHook>,
}

impl<T: Transport> AlertLayer<T> {
    /// Creates a layer for `transport`, failing when its level is unknown.
    pub fn new(transport: Arc<T>) -> Result<Self, ConfigurationError> {
        let level = parse_level(transport.level())?;
        Ok(Self {
            transport,
            level,
            on_outcome: None,
        })
    }

    /// Creates the layer and, if the transport asks for it, routes panics to
    /// it as well.
    pub fn register(transport: Arc<T>) -> Result<Self, ConfigurationError> {
        let layer = Self::new(transport.clone())?;
        if transport.handle_exceptions() {
            panic_hook::install(transport);
        }
        Ok(layer)
    }

    /// Reports each publish outcome to `hook`. The hook runs on whichever
    /// thread completes the publish and must not log through this layer.
    pub fn on_outcome<F>(mut self, hook: F) -> Self
    where
        F: Fn(Result<PublishOutput, PublishError>) + Send + Sync + 'static,
    {
        self.on_outcome = Some(Arc::new(hook));
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    fn completion(&self) -> Completion {
        match &self.on_outcome {
            Some(hook) => {
                let hook = hook.clone();
                Box::new(move |result| hook(result))
            }
            // Delivery failures cannot be logged from here without
            // re-entering this layer.
            None => Box::new(|_| {}),
        }
    }
}

/// Parses a level name. Accepts the `tracing` names plus `warning`,
/// `verbose` and `silly`.
pub fn parse_level(level: &str) -> Result<LevelFilter, ConfigurationError> {
    match level.to_ascii_lowercase().as_str() {
        "warning" => Ok(LevelFilter::WARN),
        "verbose" => Ok(LevelFilter::DEBUG),
        "silly" => Ok(LevelFilter::TRACE),
        other => LevelFilter::from_str(other)
            .map_err(|_| ConfigurationError::UnknownLevel(level.to_string())),
    }
}

/// Whether `target` belongs to a crate whose events must not be forwarded.
/// Only the crate segment of the target is compared.
fn is_suppressed(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    SUPPRESSED_CRATES.contains(&krate)
        || SUPPRESSED_CRATE_FAMILIES
            .iter()
            .any(|family| krate.starts_with(family))
}

impl<S, T> Layer<S> for AlertLayer<T>
where
    S: Subscriber,
    T: Transport,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > self.level || is_suppressed(metadata.target()) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = metadata.level().as_str().to_ascii_lowercase();
        let message = visitor.message.unwrap_or_default();
        self.transport
            .notify(&level, &message, &visitor.fields, self.completion());
    }
}

/// Collects the `message` field and every other field as metadata.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Metadata,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == MESSAGE_FIELD {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else if !name.starts_with("log.") {
            self.fields.insert(name.to_string(), value);
        }
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}
