//! Router tests for the scrape job API.
//!
//! Drive the axum router in-process with `oneshot`, backed by
//! `MemoryJobStore` and `MockExtractor`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use scrape_jobs::{HttpExtractor, MemoryJobStore, MockExtractor, ScrapedData, ScrapedValue};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use server_core::server::{build_app, AppState};

struct TestApp {
    router: Router,
    state: AppState,
    extractor: Arc<MockExtractor>,
}

fn test_app(extractor: MockExtractor) -> TestApp {
    let extractor = Arc::new(extractor);
    let state = AppState::new(Arc::new(MemoryJobStore::new()), extractor.clone());
    TestApp {
        router: build_app(state.clone()),
        state,
        extractor,
    }
}

fn row(cells: &[(&str, &str)]) -> ScrapedData {
    cells
        .iter()
        .map(|&(column, value)| (column.to_string(), ScrapedValue::from(value)))
        .collect()
}

fn example_extractor() -> MockExtractor {
    MockExtractor::new()
        .with_field("https://example.com", "title", "Example Domain")
        .with_failure("https://broken.example.com", "connection reset")
        .with_unreachable("https://down.example.com")
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_job(app: &TestApp, url: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/scraping/jobs",
        Some(json!({ "url": url, "selectors": { "title": "h1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["jobId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_execute_get_flow() {
    let app = test_app(example_extractor());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/scraping/jobs",
        Some(json!({ "url": "https://example.com", "selectors": { "title": "h1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["status"], "PENDING");
    assert!(created["data"]["createdAt"].is_string());
    let job_id = created["data"]["jobId"].as_str().unwrap().to_string();

    let (status, pending) = send(&app, Method::GET, &format!("/api/scraping/jobs/{job_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["data"]["jobId"], job_id.as_str());
    assert_eq!(pending["data"]["status"], "PENDING");
    assert_eq!(pending["data"]["url"], "https://example.com");

    let (status, executed) = send(
        &app,
        Method::POST,
        &format!("/api/scraping/jobs/{job_id}/execute"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(executed["data"]["status"], "COMPLETED");
    assert_eq!(executed["data"]["result"], json!({ "title": "Example Domain" }));
    assert!(executed["data"]["completedAt"].is_string());

    let (_, completed) = send(&app, Method::GET, &format!("/api/scraping/jobs/{job_id}"), None).await;
    assert_eq!(completed["data"]["status"], "COMPLETED");
    assert_eq!(completed["data"]["result"], executed["data"]["result"]);
}

#[tokio::test]
async fn test_failed_scrape_is_reported_in_payload() {
    let app = test_app(example_extractor());
    let job_id = create_job(&app, "https://broken.example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/scraping/jobs/{job_id}/execute"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "FAILED");
    assert!(body["data"]["error"]
        .as_str()
        .unwrap()
        .contains("connection reset"));
    assert!(body["data"].get("result").is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_targets() {
    let app = test_app(example_extractor());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/jobs",
        Some(json!({ "url": "not-a-valid-url", "selectors": { "title": "h1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not-a-valid-url"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/jobs",
        Some(json!({ "url": "https://example.com", "selectors": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no selectors provided");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/jobs",
        Some(json!({ "url": "https://down.example.com", "selectors": { "title": "h1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unreachable"));

    let (status, body) = send(&app, Method::POST, "/api/scraping/jobs", Some(json!({ "selectors": 3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_job_is_404() {
    let app = test_app(example_extractor());

    let (status, body) = send(&app, Method::GET, "/api/scraping/jobs/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("non-existent-id"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/scraping/jobs/non-existent-id/execute",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_execute_conflicts() {
    let app = test_app(example_extractor());
    let job_id = create_job(&app, "https://example.com").await;
    let uri = format!("/api/scraping/jobs/{job_id}/execute");

    let (status, _) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("COMPLETED"));
    assert_eq!(app.extractor.scrape_count().await, 1);
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = test_app(example_extractor());
    let first = create_job(&app, "https://example.com").await;
    let second = create_job(&app, "https://example.com").await;
    send(
        &app,
        Method::POST,
        &format!("/api/scraping/jobs/{first}/execute"),
        None,
    )
    .await;

    let (status, all) = send(&app, Method::GET, "/api/scraping/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let (_, pending) = send(&app, Method::GET, "/api/scraping/jobs?status=pending", None).await;
    let pending = pending["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["jobId"], second.as_str());

    let (status, _) = send(&app, Method::GET, "/api/scraping/jobs?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, deleted) = send(&app, Method::DELETE, &format!("/api/scraping/jobs/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["deleted"], true);

    let (status, _) = send(&app, Method::GET, &format!("/api/scraping/jobs/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_index() {
    let app = test_app(example_extractor());

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "scrape-jobs");
    assert_eq!(health["extractor"], "mock");
    assert!(health["timestamp"].is_string());

    let (status, index) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(index["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["route"] == "POST /api/scraping/jobs/:jobId/execute"));
    assert!(index["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["route"] == "POST /api/scraping/table"));
}

#[tokio::test]
async fn test_shutdown_rejects_new_work() {
    let app = test_app(example_extractor());
    let job_id = create_job(&app, "https://example.com").await;

    app.state.jobs.shutdown().await;
    assert_eq!(app.extractor.close_count(), 1);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/scraping/jobs/{job_id}/execute"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "shutting_down");
}

#[tokio::test]
async fn test_scrape_table_envelope() {
    let app = test_app(
        example_extractor().with_table(
            "https://example.com/people",
            vec![
                row(&[("name", "Ada"), ("role", "Engineer")]),
                row(&[("name", "Grace")]),
                row(&[("name", "Linus"), ("role", "Maintainer")]),
            ],
        ),
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/table",
        Some(json!({
            "url": "https://example.com/people",
            "tableSelector": "table.people",
            "rowSelector": "tbody tr",
            "columnSelectors": { "name": "td.name", "role": "td.role" },
            "maxRows": 2
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["url"], "https://example.com/people");
    assert_eq!(body["data"]["totalRows"], 2);
    assert_eq!(
        body["data"]["data"],
        json!([
            { "name": "Ada", "role": "Engineer" },
            { "name": "Grace", "role": null }
        ])
    );
    assert!(body["data"]["scrapedAt"].is_string());

    // No job is created for a table scrape
    let (_, jobs) = send(&app, Method::GET, "/api/scraping/jobs", None).await;
    assert_eq!(jobs["data"], json!([]));
}

#[tokio::test]
async fn test_scrape_table_errors() {
    let app = test_app(example_extractor());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/table",
        Some(json!({
            "url": "https://example.com",
            "tableSelector": "",
            "rowSelector": "tr",
            "columnSelectors": { "name": "td" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tableSelector must not be empty");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/table",
        Some(json!({
            "url": "https://broken.example.com",
            "tableSelector": "table",
            "rowSelector": "tr",
            "columnSelectors": { "name": "td" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("connection reset"));

    let (status, _) = send(&app, Method::POST, "/api/scraping/table", Some(json!({ "url": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scrape_table_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<table class="people"><tbody>
                 <tr><td class="name">Ada</td><td class="role">Engineer</td></tr>
                 <tr><td class="name">Grace</td></tr>
               </tbody></table>"#
                .as_bytes()
                .to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;

    let state = AppState::new(
        Arc::new(MemoryJobStore::new()),
        Arc::new(HttpExtractor::new()),
    );
    let app = TestApp {
        router: build_app(state.clone()),
        state,
        extractor: Arc::new(MockExtractor::new()),
    };

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/table",
        Some(json!({
            "url": format!("{}/people", server.uri()),
            "tableSelector": "table.people",
            "rowSelector": "tbody tr",
            "columnSelectors": { "name": ".name", "role": ".role" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["totalRows"], 2);
    assert_eq!(body["data"]["data"][0]["role"], "Engineer");
    assert!(body["data"]["data"][1]["role"].is_null());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scraping/table",
        Some(json!({
            "url": format!("{}/people", server.uri()),
            "tableSelector": "table.missing",
            "rowSelector": "tr",
            "columnSelectors": { "name": ".name" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("table.missing"));

    app.state.jobs.shutdown().await;
}
