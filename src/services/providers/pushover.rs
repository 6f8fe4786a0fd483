use super::{ProviderError, ProviderResponse, PushNotification, PushProvider};
use crate::config::PushoverConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1";

/// Pushover message-delivery provider.
///
/// Holds a single reqwest client, constructed once at startup and shared
/// across requests.
pub struct PushoverProvider {
    config: PushoverConfig,
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i32,
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl PushoverProvider {
    pub fn new(config: PushoverConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            base_url: PUSHOVER_API_URL.to_string(),
        }
    }

    /// Point the provider at a different API root. Used by tests.
    pub fn with_base_url(config: PushoverConfig, base_url: impl Into<String>) -> Self {
        Self {
            config,
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PushProvider for PushoverProvider {
    async fn send(&self, note: &PushNotification) -> Result<ProviderResponse, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::NotEnabled(
                "Pushover provider is not enabled".to_string(),
            ));
        }

        if self.config.user_key.is_empty() || self.config.api_token.is_empty() {
            return Err(ProviderError::Configuration(
                "Pushover user key or API token is not configured".to_string(),
            ));
        }

        let request = PushoverRequest {
            token: &self.config.api_token,
            user: &self.config.user_key,
            title: &note.title,
            message: &note.body,
        };

        let url = format!("{}/messages.json", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to Pushover: {}", e))
            })?;

        let status = response.status();
        let body: PushoverResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!(
                "Failed to parse Pushover response (HTTP {}): {}",
                status, e
            ))
        })?;

        // Pushover reports success as status == 1 in the response body.
        if body.status != 1 {
            return Err(ProviderError::SendFailed(format!(
                "Pushover returned status {} (HTTP {}): {}",
                body.status,
                status,
                body.errors.join("; ")
            )));
        }

        tracing::info!(
            provider_id = body.request.as_deref().unwrap_or("-"),
            "Push notification sent via Pushover"
        );

        Ok(ProviderResponse::success(body.request))
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock push provider for testing and for deployments with Pushover disabled.
pub struct MockPushProvider {
    enabled: bool,
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<PushNotification>>,
}

impl MockPushProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fail: false,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A mock that accepts the send attempt and then reports delivery failure.
    pub fn failing() -> Self {
        Self {
            enabled: true,
            fail: true,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Notifications handed to this provider, in order.
    pub fn sent(&self) -> Vec<PushNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, note: &PushNotification) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock push provider is not enabled".to_string(),
            ));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(note.clone());

        if self.fail {
            return Err(ProviderError::SendFailed(
                "Mock push provider forced failure".to_string(),
            ));
        }

        tracing::info!(title = %note.title, "[MOCK] Push notification would be sent");

        Ok(ProviderResponse::success(Some(format!(
            "mock-push-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
