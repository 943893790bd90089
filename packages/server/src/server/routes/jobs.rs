//! Scrape job endpoints under `/api/scraping/jobs`.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use scrape_jobs::{
    CreateJobResponse, ExecuteJobResponse, JobId, JobStatus, JobView, TargetConfig,
};

use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobResponse {
    pub job_id: JobId,
    pub deleted: bool,
}

/// POST /api/scraping/jobs
pub async fn create_job_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<TargetConfig>, JsonRejection>,
) -> ApiResult<(StatusCode, ApiResponse<CreateJobResponse>)> {
    let Json(config) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let created = state.jobs.create(config).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

/// POST /api/scraping/jobs/:jobId/execute
///
/// A failed scrape is still a 200; the payload carries `status: FAILED`.
pub async fn execute_job_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<ApiResponse<ExecuteJobResponse>> {
    let outcome = state.jobs.execute(&JobId::from(job_id)).await?;
    Ok(ApiResponse::success(outcome))
}

/// GET /api/scraping/jobs/:jobId
pub async fn get_job_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<ApiResponse<JobView>> {
    let view = state.jobs.get(&JobId::from(job_id)).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/scraping/jobs?status=PENDING
pub async fn list_jobs_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<ApiResponse<Vec<JobView>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let jobs = state.jobs.list(status).await?;
    Ok(ApiResponse::success(jobs))
}

/// DELETE /api/scraping/jobs/:jobId
pub async fn delete_job_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<ApiResponse<DeleteJobResponse>> {
    let job_id = JobId::from(job_id);
    state.jobs.delete(&job_id).await?;
    Ok(ApiResponse::success(DeleteJobResponse {
        job_id,
        deleted: true,
    }))
}
