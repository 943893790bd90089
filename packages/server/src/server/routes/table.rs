//! One-shot table extraction under `/api/scraping/table`.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use scrape_jobs::{TableConfig, TableResult};

use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResponse, ApiResult};

/// POST /api/scraping/table
///
/// Fetch failures are errors here, not payloads: no job records them.
pub async fn scrape_table_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<TableConfig>, JsonRejection>,
) -> ApiResult<ApiResponse<TableResult>> {
    let Json(config) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let table = state.jobs.scrape_table(config).await?;
    Ok(ApiResponse::success(table))
}
