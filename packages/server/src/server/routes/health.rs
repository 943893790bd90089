use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AppState;

pub const SERVICE_NAME: &str = "scrape-jobs";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    timestamp: DateTime<Utc>,
    extractor: String,
}

/// Health check endpoint
///
/// Returns 200 OK while the job service accepts work, 503 Service
/// Unavailable once it has been shut down.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = if state.jobs.is_shut_down() {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting_down")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            service: SERVICE_NAME.to_string(),
            timestamp: Utc::now(),
            extractor: state.extractor_name.clone(),
        }),
    )
}
