//! Pipe configuration resolved from environment variables.
//!
//! Every option is declared once in [`SCHEMA`]. Resolution checks all rules
//! before giving up so that a misconfigured pipe reports every problem in a
//! single run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::ValidationErrors;

/// Teams incoming webhook URL.
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";
/// Text of the synthesized message card.
pub const ENV_MESSAGE: &str = "MESSAGE";
/// Path to a JSON file sent as the request body.
pub const ENV_PAYLOAD_FILE: &str = "PAYLOAD_FILE";
/// Title of the synthesized message card.
pub const ENV_TITLE: &str = "TITLE";
/// Enables debug logging.
pub const ENV_DEBUG: &str = "DEBUG";

/// Exactly one of these must be provided.
const PAYLOAD_SOURCES: [&str; 2] = [ENV_MESSAGE, ENV_PAYLOAD_FILE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKind {
    Url,
    String,
    Boolean,
}

#[derive(Debug)]
struct OptionSpec {
    name: &'static str,
    kind: OptionKind,
    required: bool,
    excludes: Option<&'static str>,
}

/// Declared pipe options. `MESSAGE` and `PAYLOAD_FILE` are not marked
/// required here; [`PAYLOAD_SOURCES`] requires exactly one of them.
const SCHEMA: &[OptionSpec] = &[
    OptionSpec {
        name: ENV_WEBHOOK_URL,
        kind: OptionKind::Url,
        required: true,
        excludes: None,
    },
    OptionSpec {
        name: ENV_MESSAGE,
        kind: OptionKind::String,
        required: false,
        excludes: Some(ENV_PAYLOAD_FILE),
    },
    OptionSpec {
        name: ENV_PAYLOAD_FILE,
        kind: OptionKind::String,
        required: false,
        excludes: Some(ENV_MESSAGE),
    },
    OptionSpec {
        name: ENV_TITLE,
        kind: OptionKind::String,
        required: false,
        excludes: Some(ENV_PAYLOAD_FILE),
    },
    OptionSpec {
        name: ENV_DEBUG,
        kind: OptionKind::Boolean,
        required: false,
        excludes: None,
    },
];

enum Value {
    Url(Url),
    Text(String),
    Flag(bool),
}

impl OptionKind {
    fn coerce(self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Url => Url::parse(raw)
                .map(Value::Url)
                .map_err(|e| format!("must be a valid URL ({e})")),
            Self::String => Ok(Value::Text(raw.to_string())),
            Self::Boolean => parse_bool(raw)
                .map(Value::Flag)
                .ok_or_else(|| "must be of boolean type".to_string()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Where the request body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Synthesize a message card.
    Message { text: String, title: Option<String> },
    /// Send the contents of a JSON file verbatim.
    File(PathBuf),
}

/// Validated pipe configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    webhook_url: Url,
    source: PayloadSource,
    debug: bool,
}

impl Configuration {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ValidationErrors> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ValidationErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present: HashMap<&'static str, String> = SCHEMA
            .iter()
            .filter_map(|option| {
                lookup(option.name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (option.name, value))
            })
            .collect();

        let mut errors = ValidationErrors::new();
        let mut resolved: HashMap<&'static str, Value> = HashMap::new();

        for option in SCHEMA {
            let Some(raw) = present.get(option.name) else {
                if option.required {
                    errors.add(option.name, "required field");
                }
                continue;
            };

            if let Some(other) = option.excludes {
                if present.contains_key(other) {
                    errors.add(
                        option.name,
                        format!("'{other}' must not be present with '{}'", option.name),
                    );
                }
            }

            match option.kind.coerce(raw) {
                Ok(value) => {
                    resolved.insert(option.name, value);
                }
                Err(message) => errors.add(option.name, message),
            }
        }

        if !PAYLOAD_SOURCES.iter().any(|name| present.contains_key(name)) {
            let [first, second] = PAYLOAD_SOURCES;
            for name in PAYLOAD_SOURCES {
                errors.add(name, format!("one of '{first}' or '{second}' is required"));
            }
        }

        let webhook_url = match resolved.remove(ENV_WEBHOOK_URL) {
            Some(Value::Url(url)) => Some(url),
            _ => None,
        };
        let debug = matches!(resolved.get(ENV_DEBUG), Some(Value::Flag(true)));
        let title = take_text(&mut resolved, ENV_TITLE);
        let source = match (
            take_text(&mut resolved, ENV_MESSAGE),
            take_text(&mut resolved, ENV_PAYLOAD_FILE),
        ) {
            (Some(text), None) => Some(PayloadSource::Message { text, title }),
            (None, Some(path)) => Some(PayloadSource::File(PathBuf::from(path))),
            _ => None,
        };

        match (webhook_url, source) {
            (Some(webhook_url), Some(source)) if errors.is_empty() => Ok(Self {
                webhook_url,
                source,
                debug,
            }),
            // Any missing piece has a recorded error.
            _ => Err(errors),
        }
    }

    #[must_use]
    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    #[must_use]
    pub fn source(&self) -> &PayloadSource {
        &self.source
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.source {
            PayloadSource::Message { text, .. } => Some(text.as_str()),
            PayloadSource::File(_) => None,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match &self.source {
            PayloadSource::Message { title, .. } => title.as_deref(),
            PayloadSource::File(_) => None,
        }
    }

    #[must_use]
    pub fn payload_file(&self) -> Option<&Path> {
        match &self.source {
            PayloadSource::File(path) => Some(path.as_path()),
            PayloadSource::Message { .. } => None,
        }
    }
}

fn take_text(values: &mut HashMap<&'static str, Value>, name: &str) -> Option<String> {
    match values.remove(name) {
        Some(Value::Text(text)) => Some(text),
        _ => None,
    }
}
