//! Validated description of what to fetch and how to extract it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TargetError;

/// Default navigation timeout (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A cookie injected before navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Defaults to the target host when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Unvalidated input for building a [`Target`].
///
/// Also the wire shape of a create-job request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    pub url: String,
    #[serde(default)]
    pub selectors: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Cookie>>,
}

impl TargetConfig {
    /// Create a config for a URL with no selectors yet.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a field → selector entry.
    pub fn selector(mut self, field: impl Into<String>, selector: impl Into<String>) -> Self {
        self.selectors.insert(field.into(), selector.into());
        self
    }

    pub fn with_wait_for_selector(mut self, selector: impl Into<String>) -> Self {
        self.wait_for_selector = Some(selector.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.get_or_insert_with(Vec::new).push(cookie);
        self
    }

    /// Validate and build the target.
    pub fn build(self) -> Result<Target, TargetError> {
        Target::new(self)
    }
}

/// Immutable, validated scrape target.
///
/// Always has a parseable absolute URL and at least one selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TargetConfig")]
pub struct Target {
    url: String,
    selectors: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_for_selector: Option<String>,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cookies: Option<Vec<Cookie>>,
}

impl Target {
    /// Validate a config into a target.
    ///
    /// Fails on a malformed URL or an empty selector mapping. A missing or
    /// zero timeout falls back to [`DEFAULT_TIMEOUT_MS`].
    pub fn new(config: TargetConfig) -> Result<Self, TargetError> {
        Self::validate_url(&config.url)?;
        if config.selectors.is_empty() {
            return Err(TargetError::NoSelectors);
        }

        Ok(Self {
            url: config.url,
            selectors: config.selectors,
            wait_for_selector: config.wait_for_selector,
            timeout: config
                .timeout
                .filter(|t| *t > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            headers: config.headers,
            cookies: config.cookies,
        })
    }

    fn validate_url(url: &str) -> Result<Url, TargetError> {
        let invalid = || TargetError::InvalidUrl {
            url: url.to_string(),
        };
        let parsed = Url::parse(url).map_err(|_| invalid())?;
        if !parsed.has_host() {
            return Err(invalid());
        }
        Ok(parsed)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host of the target URL.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    pub fn selectors(&self) -> &IndexMap<String, String> {
        &self.selectors
    }

    pub fn wait_for_selector(&self) -> Option<&str> {
        self.wait_for_selector.as_deref()
    }

    /// Navigation timeout in milliseconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn headers(&self) -> Option<&IndexMap<String, String>> {
        self.headers.as_ref()
    }

    pub fn cookies(&self) -> Option<&[Cookie]> {
        self.cookies.as_deref()
    }
}

impl TryFrom<TargetConfig> for Target {
    type Error = TargetError;

    fn try_from(config: TargetConfig) -> Result<Self, Self::Error> {
        Target::new(config)
    }
}
