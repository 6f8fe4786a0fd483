pub mod pushover;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ContactSubmission;

pub use pushover::{MockPushProvider, PushoverProvider};

pub const NOTIFICATION_TITLE: &str = "New contact inquiry";
pub const PHONE_PLACEHOLDER: &str = "none";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub success: bool,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self {
            provider_id,
            success: true,
        }
    }
}

/// A formatted push notification, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

impl PushNotification {
    /// Render a submission with the fixed template: header line, name and
    /// phone label lines (placeholder when phone is absent), blank line,
    /// then the raw message.
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        let phone = submission.phone.as_deref().unwrap_or(PHONE_PLACEHOLDER);
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!(
                "\u{1F4E9} New inquiry\nName: {}\nPhone: {}\n\n{}",
                submission.name, phone, submission.message
            ),
        }
    }
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver a notification. Exactly one attempt: failures surface to the
    /// caller, nothing is retried or queued.
    async fn send(&self, note: &PushNotification) -> Result<ProviderResponse, ProviderError>;
    fn is_enabled(&self) -> bool;
}
