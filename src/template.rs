//! Subject and body templating.
//!
//! Templates carry three placeholders: `%l` (level), `%e` (message text) and
//! `%m` (rendered metadata). Each placeholder is substituted at its first
//! occurrence only, in that order. Later passes see the text inserted by
//! earlier ones.

use crate::inspect::{inspect, DEFAULT_DEPTH};
use serde_json::Value;

/// Structured key-value data attached to a log event.
pub type Metadata = serde_json::Map<String, Value>;

pub const LEVEL_PLACEHOLDER: &str = "%l";
pub const MESSAGE_PLACEHOLDER: &str = "%e";
pub const METADATA_PLACEHOLDER: &str = "%m";

/// How metadata is turned into text before substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    /// Compact JSON text.
    Json,
    /// Structural rendering bounded at depth 5.
    Inspect,
}

impl MetadataFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            MetadataFormat::Json
        } else {
            MetadataFormat::Inspect
        }
    }

    pub fn render(self, metadata: &Metadata) -> String {
        match self {
            // Serializing a map of JSON values cannot fail.
            MetadataFormat::Json => serde_json::to_string(metadata).unwrap_or_default(),
            MetadataFormat::Inspect => inspect(&Value::Object(metadata.clone()), DEFAULT_DEPTH),
        }
    }
}

/// Values substituted into a template for a single event.
#[derive(Debug, Clone, Copy)]
pub struct Substitution<'a> {
    pub level: &'a str,
    pub message: &'a str,
    pub metadata: &'a str,
}

impl Substitution<'_> {
    /// Renders `template`, replacing the first occurrence of each placeholder.
    pub fn apply(&self, template: &str) -> String {
        template
            .replacen(LEVEL_PLACEHOLDER, self.level, 1)
            .replacen(MESSAGE_PLACEHOLDER, self.message, 1)
            .replacen(METADATA_PLACEHOLDER, self.metadata, 1)
    }
}
