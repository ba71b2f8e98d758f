//! Notification channel implementations.

pub mod teams;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::payload::Payload;

/// Destination a payload is delivered to.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver `payload`, returning the raw response body.
    async fn send(&self, payload: &Payload) -> Result<String, NotifyError>;
}
