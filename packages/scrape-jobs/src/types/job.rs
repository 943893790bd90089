//! Scrape job aggregate and its lifecycle state machine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::result::ScrapeResult;
use super::status::JobStatus;
use super::target::Target;
use crate::error::TransitionError;

/// Opaque job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A scrape job: one target tracked from submission to a terminal outcome.
///
/// `id` and `target` never change. `result` is present only when
/// `Completed`, `error` only when `Failed`. Every transition strictly
/// advances `updated_at`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    id: JobId,
    target: Target,
    status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ScrapeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a pending job with a generated id.
    pub fn new(target: Target) -> Self {
        Self::with_id(JobId::new(), target)
    }

    /// Create a pending job with a caller-supplied id.
    pub fn with_id(id: JobId, target: Target) -> Self {
        let now = Utc::now();
        Self {
            id,
            target,
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result(&self) -> Option<&ScrapeResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// `Pending → Running`.
    pub fn mark_running(&mut self) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running)
    }

    /// `Running → Completed`, storing the result.
    pub fn mark_completed(&mut self, result: ScrapeResult) -> Result<(), TransitionError> {
        self.transition(JobStatus::Completed)?;
        self.result = Some(result);
        Ok(())
    }

    /// `Running → Failed`, storing the error description.
    ///
    /// An empty message is recorded as `"unknown error"`.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed)?;
        let error = error.into();
        self.error = Some(if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        });
        Ok(())
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Advance `updated_at`, even when the clock has not moved.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    // ------------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------------

    pub fn is_pending(&self) -> bool {
        self.status == JobStatus::Pending
    }

    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == JobStatus::Failed
    }
}
