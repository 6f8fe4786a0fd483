use axum::{response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// Root service-info route.
pub async fn root_info() -> impl IntoResponse {
    Json(json!({
        "message": "Contact API Server is running!",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness probe (long-running deployments only).
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
