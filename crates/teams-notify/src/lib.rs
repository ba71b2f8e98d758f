//! CI pipeline step that posts a notification to a Microsoft Teams
//! incoming webhook.
//!
//! # Usage
//!
//! ```no_run
//! use teams_notify::{run, Configuration, TeamsChannel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration::from_env()?;
//! let channel = TeamsChannel::new(config.webhook_url().clone());
//! let summary = run(&config, &channel).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The pipe is configured via environment variables:
//!
//! - `WEBHOOK_URL`: Teams incoming webhook URL (required)
//! - `MESSAGE`: Message card text (exactly one of `MESSAGE`/`PAYLOAD_FILE`)
//! - `PAYLOAD_FILE`: Path to a JSON file sent verbatim as the body
//! - `TITLE`: Message card title (not allowed with `PAYLOAD_FILE`)
//! - `DEBUG`: Set to "true" for debug logging
//!
//! # Architecture
//!
//! - [`Configuration`] validates the environment and aggregates every error
//! - [`build_payload`] loads the payload file or synthesizes a [`MessageCard`]
//! - [`NotifyChannel`] delivers the payload; [`TeamsChannel`] posts it over HTTP
//! - [`run`] sequences the three and returns a terminal result

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod report;

pub use channels::teams::TeamsChannel;
pub use channels::NotifyChannel;
pub use config::{Configuration, PayloadSource};
pub use error::{NotifyError, ValidationErrors};
pub use payload::{build_payload, MessageCard, Payload};

use tracing::{debug, info};

/// Summary reported when the webhook accepts the notification.
pub const BASE_SUCCESS_MESSAGE: &str = "Notification successful";

/// Build the payload for `config` and deliver it through `channel`.
///
/// Nothing is sent when the payload cannot be built. On success returns
/// [`BASE_SUCCESS_MESSAGE`].
pub async fn run(
    config: &Configuration,
    channel: &dyn NotifyChannel,
) -> Result<&'static str, NotifyError> {
    info!("Sending notification to TEAMS ...");

    let payload = build_payload(config)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let body = serde_json::to_string(&payload).unwrap_or_default();
        debug!("Payload: {body}");
    }

    let response_text = channel.send(&payload).await?;
    info!(channel = channel.name(), "HTTP Response: {response_text}");

    Ok(BASE_SUCCESS_MESSAGE)
}
