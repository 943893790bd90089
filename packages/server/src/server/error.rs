//! Response envelope and error mapping for the HTTP API.
//!
//! Every body is `{ "success": bool, "data"?: .., "error"?: string }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use scrape_jobs::{JobError, ScrapeError};

/// Response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Errors surfaced by route handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request could not be decoded
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Job(#[from] JobError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Job(err) => match err {
                JobError::Target(_) | JobError::Unreachable { .. } => StatusCode::BAD_REQUEST,
                JobError::NotFound { .. } => StatusCode::NOT_FOUND,
                JobError::AlreadyProcessed { .. } | JobError::NotDeletable { .. } => {
                    StatusCode::CONFLICT
                }
                JobError::Scrape(
                    ScrapeError::InvalidSelector { .. } | ScrapeError::InvalidHeader { .. },
                ) => StatusCode::BAD_REQUEST,
                JobError::Scrape(ScrapeError::SelectorNeverAppeared { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                JobError::Scrape(_) => StatusCode::BAD_GATEWAY,
                JobError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
                JobError::IllegalTransition(_) | JobError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

/// Alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
