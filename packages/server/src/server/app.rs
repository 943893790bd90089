//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use scrape_jobs::{Extractor, HttpExtractor, JobService, JobStore, MemoryJobStore};

use crate::config::Config;
use crate::server::routes::{
    create_job_handler, delete_job_handler, execute_job_handler, get_job_handler,
    health_handler, index_handler, list_jobs_handler, scrape_table_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobService>,
    pub extractor_name: String,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>, extractor: Arc<dyn Extractor>) -> Self {
        let extractor_name = extractor.name().to_string();
        Self {
            jobs: Arc::new(JobService::new(store, extractor)),
            extractor_name,
        }
    }

    /// In-memory store and HTTP extractor configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let extractor = HttpExtractor::new()
            .with_user_agent(config.scraper_user_agent.clone())
            .with_validation_timeout(config.validation_timeout_ms);

        Self::new(Arc::new(MemoryJobStore::new()), Arc::new(extractor))
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/scraping/jobs",
            post(create_job_handler).get(list_jobs_handler),
        )
        .route(
            "/api/scraping/jobs/:jobId",
            get(get_job_handler).delete(delete_job_handler),
        )
        .route("/api/scraping/jobs/:jobId/execute", post(execute_job_handler))
        .route("/api/scraping/table", post(scrape_table_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
