use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::models::ContactRequest;
use crate::services::PushNotification;
use crate::startup::AppState;

pub const CONFIRMATION_TEXT: &str = "your inquiry has been sent successfully";

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// Accept a contact-form submission and relay it as a push notification.
///
/// Either the submission is rejected with no side effect, or exactly one
/// delivery attempt is made; a failed attempt drops the submission (500,
/// detail logged server-side only).
#[tracing::instrument(skip(state, request))]
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(request): AppJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    tracing::info!("Contact submission received");

    let submission = request.validate(state.variant)?;

    tracing::info!(
        name = %submission.name,
        message_preview = %preview(&submission.message),
        phone = submission.phone.as_deref().unwrap_or("none"),
        "Contact submission validated"
    );

    let note = PushNotification::from_submission(&submission);
    let response = state.push_provider.send(&note).await?;

    tracing::info!(
        provider_id = response.provider_id.as_deref().unwrap_or("-"),
        "Contact notification delivered"
    );

    Ok((
        StatusCode::OK,
        Json(ContactResponse {
            success: true,
            message: CONFIRMATION_TEXT.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }),
    ))
}

/// Truncate the message for log lines; full text only ever goes to the provider.
fn preview(message: &str) -> String {
    if message.chars().count() <= 50 {
        message.to_string()
    } else {
        let head: String = message.chars().take(50).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_messages() {
        let long = "x".repeat(80);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 53);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_messages() {
        assert_eq!(preview("hello"), "hello");
    }
}
