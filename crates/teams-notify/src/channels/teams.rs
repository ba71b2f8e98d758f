//! Microsoft Teams incoming webhook channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::payload::Payload;
use crate::NotifyChannel;

/// Request timeout applied to the webhook call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Teams incoming webhook channel.
pub struct TeamsChannel {
    webhook_url: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl TeamsChannel {
    /// Create a Teams channel posting to `webhook_url`.
    #[must_use]
    pub fn new(webhook_url: Url) -> Self {
        Self {
            webhook_url,
            timeout: REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl NotifyChannel for TeamsChannel {
    fn name(&self) -> &'static str {
        "teams"
    }

    async fn send(&self, payload: &Payload) -> Result<String, NotifyError> {
        debug!(
            channel = "teams",
            timeout_secs = self.timeout.as_secs_f64(),
            "Posting to webhook"
        );

        let response = self
            .client
            .post(self.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        if let Some(e) = status_error {
            let body = response.text().await.unwrap_or_default();
            warn!(
                channel = "teams",
                status = %status,
                body = %body,
                "Teams webhook request failed"
            );
            return Err(NotifyError::Transport(e));
        }

        response.text().await.map_err(NotifyError::Transport)
    }
}
