//! Error types surfaced by the alert adapter.

use thiserror::Error;

/// Raised while building an [`AlertDispatcher`](crate::dispatcher::AlertDispatcher)
/// or registering it with the logging pipeline.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// One or more required options were not supplied.
    #[error("You must specify options: {} to use sns-alert.", .0.join(","))]
    MissingOptions(Vec<&'static str>),

    /// The minimum level is not a level the logging pipeline understands.
    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),

    /// The options could not be read from their sources.
    #[error("Failed to load options: {0}")]
    Load(#[from] figment::Error),
}

/// Failure of a single publish attempt, reported through the completion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The notification service rejected or failed the request.
    #[error("SNS publish failed: {0}")]
    Service(String),

    /// The client was asked to run an operation other than `Publish`.
    #[error("Unsupported operation '{0}'")]
    UnsupportedOperation(String),

    /// No tokio runtime was available to drive the publish.
    #[error("No tokio runtime available to publish on")]
    NoRuntime,

    /// The client dropped the completion without answering.
    #[error("Publish completion was dropped before the outcome was reported")]
    Dropped,
}
