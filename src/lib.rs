//! sns-alert - forwards log events to AWS SNS as alert notifications
//!
//! The [`AlertDispatcher`] validates its options once, holds a shared SNS
//! client and turns each event it is handed into a single `Publish` call with
//! a templated subject and body. [`AlertLayer`] plugs a dispatcher into a
//! `tracing` subscriber stack.

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod inspect;
pub mod layer;
pub mod panic_hook;
pub mod template;
pub mod transport;

pub use client::{
    ClientFactory, Completion, NotificationClient, PublishOutput, PublishRequest, Publisher,
    SpawningClient, PUBLISH_OPERATION,
};
pub use config::{AlertOptions, AlertSettings, Credentials};
pub use dispatcher::{AlertDispatcher, TRANSPORT_NAME};
pub use error::{ConfigurationError, PublishError};
pub use layer::AlertLayer;
pub use template::Metadata;
pub use transport::Transport;
