//! Configuration for the alert adapter.
//!
//! `AlertOptions` holds whatever the caller supplied, every key optional. It is
//! turned into an immutable `AlertSettings` exactly once, when the dispatcher
//! is constructed: required keys are checked first, then the documented
//! defaults fill whatever is still missing. Options can be read from a TOML
//! file merged with `SNS_ALERT_*` environment variables using `figment`.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SUBJECT_TEMPLATE: &str = "Winston Error Report";
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Level '%l' Error:\n%e\n\nMetadata:\n%m";
pub const DEFAULT_MINIMUM_LEVEL: &str = "info";

/// Options as supplied by the caller.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AlertOptions {
    /// Destination topic for published notifications.
    #[serde(default, alias = "topicIdentifier")]
    pub topic_identifier: Option<String>,
    /// Service region, passed as-is to the client factory.
    #[serde(default)]
    pub region: Option<String>,
    /// Template for the notification subject.
    #[serde(default, alias = "subjectTemplate")]
    pub subject_template: Option<String>,
    /// Template for the notification body.
    #[serde(default, alias = "messageTemplate")]
    pub message_template: Option<String>,
    /// Severity threshold reported to the logging pipeline.
    #[serde(default, alias = "minimumLevel")]
    pub minimum_level: Option<String>,
    /// Whether panics are routed to the adapter as well.
    #[serde(default, alias = "captureUncaughtExceptions")]
    pub capture_uncaught_exceptions: Option<bool>,
    /// Render metadata as JSON instead of the structural form.
    #[serde(default, alias = "renderMetadataAsJson")]
    pub render_metadata_as_json: Option<bool>,
    #[serde(default, alias = "accessKeyId")]
    pub access_key_id: Option<String>,
    #[serde(default, alias = "secretAccessKey")]
    pub secret_access_key: Option<String>,
    #[serde(default, alias = "sessionToken")]
    pub session_token: Option<String>,
}

impl AlertOptions {
    /// Creates options carrying only the destination topic.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic_identifier: Some(topic.into()),
            ..Default::default()
        }
    }

    /// Loads options from an optional TOML file, then lets environment
    /// variables override them, e.g. `SNS_ALERT_TOPIC_IDENTIFIER=arn:...`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut figment = Figment::new();
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        let options = figment.merge(Env::prefixed("SNS_ALERT_")).extract()?;
        Ok(options)
    }

    /// Every option the adapter cannot start without, paired with whether it
    /// was supplied.
    fn required_presence(&self) -> [(&'static str, bool); 1] {
        [("topic_identifier", self.topic_identifier.is_some())]
    }

    /// Names of required options that were not supplied, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.required_presence()
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(key, _)| key)
            .collect()
    }

    /// Validates the required keys and merges in the defaults.
    pub fn into_settings(self) -> Result<AlertSettings, ConfigurationError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ConfigurationError::MissingOptions(missing));
        }

        Ok(AlertSettings {
            topic_identifier: self.topic_identifier.unwrap_or_default(),
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            subject_template: self
                .subject_template
                .unwrap_or_else(|| DEFAULT_SUBJECT_TEMPLATE.to_string()),
            message_template: self
                .message_template
                .unwrap_or_else(|| DEFAULT_MESSAGE_TEMPLATE.to_string()),
            minimum_level: self
                .minimum_level
                .unwrap_or_else(|| DEFAULT_MINIMUM_LEVEL.to_string()),
            capture_uncaught_exceptions: self.capture_uncaught_exceptions.unwrap_or(false),
            render_metadata_as_json: self.render_metadata_as_json.unwrap_or(false),
            credentials: Credentials {
                access_key_id: self.access_key_id,
                secret_access_key: self.secret_access_key,
                session_token: self.session_token,
            },
        })
    }
}

/// Credentials handed to the client factory. Absent fields mean the ambient
/// credential chain is used.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Returns the static key pair, if both halves were supplied.
    pub fn static_pair(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validated, fully defaulted settings. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSettings {
    pub topic_identifier: String,
    pub region: String,
    pub subject_template: String,
    pub message_template: String,
    pub minimum_level: String,
    pub capture_uncaught_exceptions: bool,
    pub render_metadata_as_json: bool,
    pub credentials: Credentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_topic_is_reported() {
        let err = AlertOptions::default().into_settings().unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingOptions(ref keys) if keys == &["topic_identifier"]));
        assert_eq!(
            err.to_string(),
            "You must specify options: topic_identifier to use sns-alert."
        );
    }

    #[test]
    fn test_missing_required_tracks_each_required_key() {
        let empty = AlertOptions::default();
        let required: Vec<_> = empty.required_presence().iter().map(|(key, _)| *key).collect();
        assert_eq!(empty.missing_required(), required);

        let complete = AlertOptions::for_topic("arn:topic");
        assert!(complete.required_presence().iter().all(|(_, present)| *present));
        assert!(complete.missing_required().is_empty());
    }

    #[test]
    fn test_defaults_fill_omitted_options() {
        let settings = AlertOptions::for_topic("arn:topic").into_settings().unwrap();

        assert_eq!(settings.topic_identifier, "arn:topic");
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.subject_template, "Winston Error Report");
        assert_eq!(
            settings.message_template,
            "Level '%l' Error:\n%e\n\nMetadata:\n%m"
        );
        assert_eq!(settings.minimum_level, "info");
        assert!(!settings.capture_uncaught_exceptions);
        assert!(!settings.render_metadata_as_json);
        assert_eq!(settings.credentials, Credentials::default());
    }

    #[test]
    fn test_supplied_options_win_over_defaults() {
        let options = AlertOptions {
            topic_identifier: Some("arn:topic".to_string()),
            region: Some("eu-west-1".to_string()),
            subject_template: Some("[%l] alert".to_string()),
            message_template: Some("%e".to_string()),
            minimum_level: Some("error".to_string()),
            capture_uncaught_exceptions: Some(true),
            render_metadata_as_json: Some(true),
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("secret".to_string()),
            session_token: None,
        };
        let settings = options.into_settings().unwrap();

        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.subject_template, "[%l] alert");
        assert_eq!(settings.message_template, "%e");
        assert_eq!(settings.minimum_level, "error");
        assert!(settings.capture_uncaught_exceptions);
        assert!(settings.render_metadata_as_json);
        assert_eq!(settings.credentials.static_pair(), Some(("key", "secret")));
    }

    #[test]
    fn test_empty_strings_are_supplied_values() {
        let options = AlertOptions {
            subject_template: Some(String::new()),
            ..AlertOptions::for_topic("")
        };
        let settings = options.into_settings().unwrap();
        assert_eq!(settings.topic_identifier, "");
        assert_eq!(settings.subject_template, "");
    }

    #[test]
    fn test_camel_case_aliases_deserialize() {
        let options: AlertOptions = serde_json::from_value(serde_json::json!({
            "topicIdentifier": "arn:topic",
            "renderMetadataAsJson": true,
            "accessKeyId": "key"
        }))
        .unwrap();
        assert_eq!(options.topic_identifier.as_deref(), Some("arn:topic"));
        assert_eq!(options.render_metadata_as_json, Some(true));
        assert_eq!(options.access_key_id.as_deref(), Some("key"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials {
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("very-secret".to_string()),
            session_token: None,
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("key"));
        assert!(!rendered.contains("very-secret"));
    }
}
