//! Command-Line Interface (CLI) argument parsing.
//!
//! The arguments are merged over the options read from the configuration file
//! and `SNS_ALERT_*` environment variables.

use crate::config::AlertOptions;
use clap::Parser;
use std::path::PathBuf;

/// Sends a test alert through the SNS alert pipeline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Destination topic ARN, overriding the configured one.
    #[arg(long, value_name = "ARN")]
    pub topic: Option<String>,

    /// Service region, overriding the configured one.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Level of the test event.
    #[arg(short, long, default_value = "error")]
    pub level: String,

    /// Render metadata as JSON.
    #[arg(long)]
    pub json: bool,

    /// Text of the test event.
    pub message: String,
}

impl Cli {
    /// Applies command-line overrides to the loaded options.
    pub fn apply(&self, mut options: AlertOptions) -> AlertOptions {
        if let Some(topic) = &self.topic {
            options.topic_identifier = Some(topic.clone());
        }
        if let Some(region) = &self.region {
            options.region = Some(region.clone());
        }
        if self.json {
            options.render_metadata_as_json = Some(true);
        }
        options
    }
}
