//! Request body construction.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Configuration, PayloadSource};
use crate::error::NotifyError;

/// Title used when `TITLE` is not set.
pub const DEFAULT_TITLE: &str =
    "Notification sent from <a href='https://bitbucket.org'>Bitbucket</a>";

/// Legacy actionable message card type.
pub const CARD_TYPE: &str = "MessageCard";
pub const CARD_CONTEXT: &str = "http://schema.org/extensions";
pub const CARD_THEME_COLOR: &str = "0076D7";

/// Teams legacy message card.
///
/// Field order matches the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: &'static str,
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "themeColor")]
    pub theme_color: &'static str,
    pub title: String,
    pub text: String,
}

impl MessageCard {
    /// Card with the fixed type, context and theme color.
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            card_type: CARD_TYPE,
            context: CARD_CONTEXT,
            theme_color: CARD_THEME_COLOR,
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Body of the webhook request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// JSON loaded from `PAYLOAD_FILE`, forwarded as-is.
    Literal(Value),
    /// Card synthesized from `MESSAGE` and `TITLE`.
    Card(MessageCard),
}

/// Build the request body for `config`.
pub fn build_payload(config: &Configuration) -> Result<Payload, NotifyError> {
    match config.source() {
        PayloadSource::File(path) => load_payload_file(path).map(Payload::Literal),
        PayloadSource::Message { text, title } => {
            let title = title.as_deref().unwrap_or(DEFAULT_TITLE);
            debug!("Final TITLE: {title}");
            Ok(Payload::Card(MessageCard::new(title, text.as_str())))
        }
    }
}

/// Read and parse a JSON payload file without inspecting its shape.
pub fn load_payload_file(path: &Path) -> Result<Value, NotifyError> {
    info!("Starting with payload provided in PAYLOAD_FILE...");

    if !path.exists() {
        return Err(NotifyError::PayloadFileMissing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path).map_err(|source| NotifyError::PayloadFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&content).map_err(|source| NotifyError::PayloadFileInvalid {
        path: path.to_path_buf(),
        source,
    })
}
