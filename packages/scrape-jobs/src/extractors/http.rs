//! HTTP-based extractor implementation.
//!
//! Fetches static HTML with reqwest and queries it with CSS selectors via
//! the `scraper` crate. No JavaScript rendering.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use reqwest::StatusCode;
use scraper::Html;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::dom;
use crate::error::{ScrapeError, ScrapeOutcome};
use crate::traits::extractor::Extractor;
use crate::types::{
    Cookie, ScrapeMetadata, ScrapeResult, ScrapedData, TableResult, TableTarget, Target,
};

/// Browser-like User-Agent to avoid naive bot detection
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pre-flight reachability timeout (milliseconds)
pub const DEFAULT_VALIDATION_TIMEOUT_MS: u64 = 10_000;

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 5;

/// A fetched page body and how it was served.
struct Fetched {
    status: StatusCode,
    body: String,
    started: Instant,
}

/// Lifecycle of the shared HTTP session.
enum Session {
    Idle,
    Open(reqwest::Client),
    Closed,
}

/// Extractor that fetches pages over HTTP and evaluates CSS selectors.
///
/// The HTTP client is created on first use and shared by every call until
/// [`Extractor::close`]. After close, `scrape` fails with
/// [`ScrapeError::SessionClosed`] and `validate_target` returns `false`.
///
/// # Example
///
/// ```rust,ignore
/// use scrape_jobs::{Extractor, HttpExtractor};
///
/// let extractor = HttpExtractor::new().with_validation_timeout(5_000);
/// let result = extractor.scrape(&target).await?;
/// extractor.close().await;
/// ```
pub struct HttpExtractor {
    session: Mutex<Session>,
    user_agent: String,
    validation_timeout: Duration,
}

impl Default for HttpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExtractor {
    /// Create a new HTTP extractor with default settings.
    pub fn new() -> Self {
        Self {
            session: Mutex::new(Session::Idle),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            validation_timeout: Duration::from_millis(DEFAULT_VALIDATION_TIMEOUT_MS),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the pre-flight reachability timeout (milliseconds).
    pub fn with_validation_timeout(mut self, ms: u64) -> Self {
        self.validation_timeout = Duration::from_millis(ms);
        self
    }

    /// Whether the shared session has been opened and not yet closed.
    pub async fn is_open(&self) -> bool {
        matches!(*self.session.lock().await, Session::Open(_))
    }

    /// Get the shared client, opening the session on first use.
    async fn client(&self) -> ScrapeOutcome<reqwest::Client> {
        let mut session = self.session.lock().await;
        match &*session {
            Session::Open(client) => Ok(client.clone()),
            Session::Closed => Err(ScrapeError::SessionClosed),
            Session::Idle => {
                let client = self.build_client()?;
                *session = Session::Open(client.clone());
                info!(user_agent = %self.user_agent, "Extraction session opened");
                Ok(client)
            }
        }
    }

    fn build_client(&self) -> ScrapeOutcome<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ScrapeError::SessionInit(Box::new(e)))
    }

    /// Target headers plus the cookie header, if any cookies apply.
    fn request_headers(target: &Target) -> ScrapeOutcome<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (name, value) in target.headers().into_iter().flatten() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ScrapeError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ScrapeError::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        if let Some(cookie) = Self::cookie_header(target) {
            let value = HeaderValue::from_str(&cookie).map_err(|_| ScrapeError::InvalidHeader {
                name: COOKIE.as_str().to_string(),
            })?;
            headers.insert(COOKIE, value);
        }

        Ok(headers)
    }

    /// Build a `Cookie` header from the cookies that apply to the target host.
    fn cookie_header(target: &Target) -> Option<String> {
        let host = target.host()?;
        let pairs: Vec<String> = target
            .cookies()?
            .iter()
            .filter(|cookie| Self::cookie_applies(cookie, &host))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// A cookie without a domain belongs to the target host.
    fn cookie_applies(cookie: &Cookie, host: &str) -> bool {
        match cookie.domain.as_deref() {
            None => true,
            Some(domain) => {
                let domain = domain.trim_start_matches('.').to_ascii_lowercase();
                let host = host.to_ascii_lowercase();
                host == domain || host.ends_with(&format!(".{}", domain))
            }
        }
    }

    /// User agent actually sent: a target header override wins.
    fn effective_user_agent(&self, target: &Target) -> String {
        target
            .headers()
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
                    .map(|(_, value)| value.clone())
            })
            .unwrap_or_else(|| self.user_agent.clone())
    }

    fn send_error(target: &Target, e: reqwest::Error) -> ScrapeError {
        if e.is_timeout() {
            ScrapeError::Timeout {
                url: target.url().to_string(),
                timeout_ms: target.timeout(),
            }
        } else {
            ScrapeError::Navigation {
                url: target.url().to_string(),
                source: Box::new(e),
            }
        }
    }

    /// Pre-flight timeout: half the target's budget, capped at the
    /// configured validation timeout, so validation never consumes the
    /// whole scrape budget.
    fn preflight_timeout(&self, target: &Target) -> Duration {
        let half = Duration::from_millis((target.timeout() / 2).max(1));
        self.validation_timeout.min(half)
    }

    /// GET the target with its headers and timeout, reading the full body.
    async fn fetch(&self, target: &Target) -> ScrapeOutcome<Fetched> {
        let started = Instant::now();
        let client = self.client().await?;
        let headers = Self::request_headers(target)?;

        let response = client
            .get(target.url())
            .headers(headers)
            .timeout(Duration::from_millis(target.timeout()))
            .send()
            .await
            .map_err(|e| Self::send_error(target, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %target.url(), status = %status, "Scraping non-success response");
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Self::send_error(target, e)
            } else {
                ScrapeError::Body {
                    url: target.url().to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        Ok(Fetched {
            status,
            body,
            started,
        })
    }

    fn metadata(&self, target: &Target, fetched: &Fetched) -> ScrapeMetadata {
        let response_time = u64::try_from(fetched.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ScrapeMetadata::new(response_time)
            .with_status_code(fetched.status.as_u16())
            .with_user_agent(self.effective_user_agent(target))
    }

    /// Parse the body, honour the wait-for selector, then extract fields.
    fn extract_document(html: &str, target: &Target) -> ScrapeOutcome<ScrapedData> {
        let document = Html::parse_document(html);

        if let Some(selector) = target.wait_for_selector() {
            // A fetched static document will not change, so there is nothing to wait for
            if !dom::has_match(&document, selector) {
                return Err(ScrapeError::SelectorNeverAppeared {
                    selector: selector.to_string(),
                });
            }
        }

        Ok(dom::extract_fields(&document, target.selectors()))
    }

    /// Parse the body and extract table rows.
    fn extract_table(html: &str, table: &TableTarget) -> ScrapeOutcome<Vec<ScrapedData>> {
        let document = Html::parse_document(html);
        dom::extract_rows(&document, table)
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn validate_target(&self, target: &Target) -> bool {
        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                warn!(url = %target.url(), error = %e, "Cannot validate target");
                return false;
            }
        };

        let headers = match Self::request_headers(target) {
            Ok(headers) => headers,
            Err(e) => {
                warn!(url = %target.url(), error = %e, "Target has unusable headers");
                return false;
            }
        };

        let timeout = self.preflight_timeout(target);

        match client
            .get(target.url())
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                debug!(url = %target.url(), "Target reachable");
                true
            }
            Ok(response) => {
                warn!(url = %target.url(), status = %response.status(), "Target returned non-success status");
                false
            }
            Err(e) => {
                warn!(url = %target.url(), error = %e, "Error validating target");
                false
            }
        }
    }

    async fn scrape(&self, target: &Target) -> ScrapeOutcome<ScrapeResult> {
        debug!(
            url = %target.url(),
            timeout_ms = target.timeout(),
            fields = target.selectors().len(),
            "HTTP scrape starting"
        );

        let fetched = self.fetch(target).await?;
        let data = Self::extract_document(&fetched.body, target)?;
        let metadata = self.metadata(target, &fetched);

        debug!(
            url = %target.url(),
            status = fetched.status.as_u16(),
            response_time_ms = metadata.response_time,
            matched = data.values().filter(|v| !v.is_null()).count(),
            "HTTP scrape completed"
        );

        Ok(ScrapeResult::new(data, target.url(), metadata))
    }

    async fn scrape_table(&self, table: &TableTarget) -> ScrapeOutcome<TableResult> {
        let target = table.target();
        debug!(
            url = %target.url(),
            table = %table.table_selector(),
            rows = %table.row_selector(),
            columns = table.columns().len(),
            "HTTP table scrape starting"
        );

        let fetched = self.fetch(target).await?;
        let rows = Self::extract_table(&fetched.body, table)?;
        let metadata = self.metadata(target, &fetched);

        debug!(
            url = %target.url(),
            status = fetched.status.as_u16(),
            rows = rows.len(),
            "HTTP table scrape completed"
        );

        Ok(TableResult::new(rows, target.url(), metadata))
    }

    async fn close(&self) {
        let mut session = self.session.lock().await;
        let was_open = matches!(*session, Session::Open(_));
        *session = Session::Closed;
        if was_open {
            info!("Extraction session closed");
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
