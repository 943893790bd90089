use axum::Json;
use serde::Serialize;

use super::health::SERVICE_NAME;

#[derive(Serialize)]
pub struct Endpoint {
    route: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
pub struct IndexResponse {
    service: &'static str,
    version: &'static str,
    endpoints: Vec<Endpoint>,
}

const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /api/scraping/jobs", "Create a scrape job"),
    ("GET /api/scraping/jobs", "List scrape jobs, optionally by ?status="),
    ("GET /api/scraping/jobs/:jobId", "Get a scrape job"),
    ("POST /api/scraping/jobs/:jobId/execute", "Execute a pending scrape job"),
    ("DELETE /api/scraping/jobs/:jobId", "Delete a scrape job that is not running"),
    ("POST /api/scraping/table", "Scrape rows of a table in one request"),
    ("GET /health", "Health check"),
];

/// GET /
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(route, description)| Endpoint { route, description })
            .collect(),
    })
}
