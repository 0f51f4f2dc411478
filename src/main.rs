//! sns-alert - sends a single alert through the configured SNS topic.
//!
//! The alert travels the same path an application's logs would: the binary
//! installs [`AlertLayer`] next to its console output and emits one event,
//! then waits for the publish outcome.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sns_alert::{cli::Cli, layer::parse_level, AlertDispatcher, AlertLayer, AlertOptions, PublishError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target of the emitted alert event. It must lie outside this crate, whose
/// own events the layer never forwards.
const ALERT_TARGET: &str = "sns_alert_cli";

const OUTCOME_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = AlertOptions::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let dispatcher = Arc::new(AlertDispatcher::new(Some(cli.apply(options)))?);

    let level = parse_level(&cli.level)?
        .into_level()
        .with_context(|| format!("Level '{}' never publishes", cli.level))?;

    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let alert_layer = AlertLayer::register(dispatcher.clone())?.on_outcome(move |result| {
        let _ = outcome_tx.send(result);
    });
    if level > alert_layer.level() {
        bail!(
            "Level '{}' is below the minimum level '{}'",
            cli.level,
            dispatcher.settings().minimum_level
        );
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
        )
        .with(alert_layer)
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Topic: {}", dispatcher.settings().topic_identifier);
    info!("Region: {}", dispatcher.settings().region);
    info!("Minimum Level: {}", dispatcher.settings().minimum_level);
    info!(
        "Metadata Format: {}",
        if dispatcher.settings().render_metadata_as_json {
            "JSON"
        } else {
            "Inspect"
        }
    );
    info!("-------------------------------------------------------");

    match level {
        Level::ERROR => error!(target: ALERT_TARGET, "{}", cli.message),
        Level::WARN => warn!(target: ALERT_TARGET, "{}", cli.message),
        Level::INFO => info!(target: ALERT_TARGET, "{}", cli.message),
        Level::DEBUG => debug!(target: ALERT_TARGET, "{}", cli.message),
        _ => trace!(target: ALERT_TARGET, "{}", cli.message),
    }

    let outcome = match tokio::time::timeout(OUTCOME_TIMEOUT, outcome_rx.recv()).await {
        Ok(Some(outcome)) => outcome,
        Ok(None) => Err(PublishError::Dropped),
        Err(_) => bail!("No publish outcome after {:?}", OUTCOME_TIMEOUT),
    };

    match outcome {
        Ok(output) => {
            info!(
                message_id = output.message_id.as_deref().unwrap_or("<none>"),
                "Alert published."
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to publish alert: {}", e);
            Err(e.into())
        }
    }
}
