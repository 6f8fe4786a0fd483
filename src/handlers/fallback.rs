use axum::response::IntoResponse;

use crate::error::AppError;

/// Any unmatched route.
pub async fn not_found() -> impl IntoResponse {
    AppError::NotFound
}
