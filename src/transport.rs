//! The capability a logging pipeline needs from an alert sink.

use crate::client::Completion;
use crate::template::Metadata;

/// A sink the logging pipeline can route events to.
pub trait Transport: Send + Sync + 'static {
    /// Constant name used when registering the sink.
    fn name(&self) -> &str;

    /// Minimum severity this sink wants to receive.
    fn level(&self) -> &str;

    /// Whether panics should also be routed here.
    fn handle_exceptions(&self) -> bool;

    /// Forwards one event. Must return without waiting for delivery; the
    /// outcome is reported to `completion`.
    fn notify(&self, level: &str, message: &str, metadata: &Metadata, completion: Completion);
}
