//! Error types for the notification pipe.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a notification run.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// One or more configuration options violate the schema
    #[error("Validation errors: \n{0}")]
    Validation(ValidationErrors),

    /// `PAYLOAD_FILE` points at nothing
    #[error("Passed PAYLOAD_FILE path does not exist.")]
    PayloadFileMissing { path: PathBuf },

    /// `PAYLOAD_FILE` exists but could not be read
    #[error("Failed to read PAYLOAD_FILE {}: {source}", path.display())]
    PayloadFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `PAYLOAD_FILE` content is not JSON
    #[error("Failed to parse PAYLOAD_FILE {}: invalid JSON provided.", path.display())]
    PayloadFileInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Connection error, timeout, or non-2xx status from the webhook
    #[error(
        "Notification failed. Pipe has finished with an error: {}",
        error_chain(.0)
    )]
    Transport(#[source] reqwest::Error),
}

/// Render `err` followed by every underlying cause, `: `-separated.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // skip causes the wrapper already printed
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

impl From<ValidationErrors> for NotifyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Validation messages collected across all options, grouped by field name.
///
/// Fields are kept sorted so the rendered report is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, empty if the field is valid.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.fields
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of all fields with at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, messages) in &self.fields {
            writeln!(f, "{field}:")?;
            for message in messages {
                writeln!(f, "- {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
