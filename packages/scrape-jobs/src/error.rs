//! Typed errors for the scrape job library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the exact failure class: construction, precondition, extraction, storage.

use thiserror::Error;

use crate::types::{JobId, JobStatus};

/// Errors raised while building a [`Target`](crate::types::Target).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// URL did not parse as an absolute URL with a host
    #[error("invalid target URL: {url}")]
    InvalidUrl { url: String },

    /// Selector mapping was absent or empty
    #[error("no selectors provided")]
    NoSelectors,

    /// A required selector was blank
    #[error("{name} must not be empty")]
    EmptySelector { name: String },
}

/// A lifecycle transition the job state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal transition from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Fetch-level failures from an [`Extractor`](crate::traits::Extractor).
///
/// Per-field misses are never errors; they surface as `null` values.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Request could not be sent or the connection failed
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Navigation exceeded the target timeout
    #[error("timed out after {timeout_ms}ms loading {url}")]
    Timeout { url: String, timeout_ms: u64 },

    /// The wait-for selector never matched the loaded document
    #[error("selector never appeared: {selector}")]
    SelectorNeverAppeared { selector: String },

    /// A structural selector could not be parsed
    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },

    /// A target header could not be encoded
    #[error("invalid header: {name}")]
    InvalidHeader { name: String },

    /// Response body could not be read
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The automation session could not be started
    #[error("failed to start extraction session: {0}")]
    SessionInit(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The automation session was closed
    #[error("extraction session is closed")]
    SessionClosed,
}

/// Errors from a [`JobStore`](crate::traits::JobStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend failed
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors returned by the [`JobService`](crate::JobService) use cases.
#[derive(Debug, Error)]
pub enum JobError {
    /// Target failed validation at construction
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Pre-flight reachability check failed
    #[error("target unreachable: {url}")]
    Unreachable { url: String },

    /// No job with this id
    #[error("job not found: {id}")]
    NotFound { id: JobId },

    /// Job already left the pending state
    #[error("job already processed, current status: {status}")]
    AlreadyProcessed { id: JobId, status: JobStatus },

    /// In-flight jobs cannot be removed
    #[error("job {id} cannot be deleted while {status}")]
    NotDeletable { id: JobId, status: JobStatus },

    /// Entity rejected a transition
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),

    /// A one-shot extraction failed
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Service has been shut down
    #[error("service is shutting down")]
    ShuttingDown,

    /// Storage operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for job use cases.
pub type Result<T> = std::result::Result<T, JobError>;

/// Result type alias for extractor operations.
pub type ScrapeOutcome<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
