//! Scrape job use cases.
//!
//! `JobService` sequences the store and the extractor into the job
//! lifecycle: create validates and persists a pending job, execute drives it
//! to a terminal state, get/list/delete read or remove it. Table scrapes
//! go straight to the extractor and leave no job behind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::error::{JobError, Result};
use crate::locks::KeyedLocks;
use crate::traits::{Extractor, JobStore};
use crate::types::{
    Job, JobId, JobStatus, ScrapedData, TableConfig, TableResult, TableTarget, Target, TargetConfig,
};

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Outcome of an execute.
///
/// Scrape failures land here as `status: FAILED` with `error` set; they are
/// not returned as `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteJobResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScrapedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl ExecuteJobResponse {
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

/// Read-only projection of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScrapedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id().clone(),
            status: job.status(),
            url: job.target().url().to_string(),
            result: job.result().map(|r| r.data().clone()),
            error: job.error().map(str::to_string),
            created_at: job.created_at(),
            updated_at: job.updated_at(),
        }
    }
}

/// Orchestrates scrape jobs over a store and an extractor.
pub struct JobService {
    store: Arc<dyn JobStore>,
    extractor: Arc<dyn Extractor>,
    locks: KeyedLocks<JobId>,
    /// Held shared by every call that reaches the extractor; `shutdown`
    /// takes it exclusively so close waits for them to drain.
    in_flight: RwLock<()>,
    shut_down: AtomicBool,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            store,
            extractor,
            locks: KeyedLocks::new(),
            in_flight: RwLock::new(()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(JobError::ShuttingDown);
        }
        Ok(())
    }

    /// Register a call that will use the extractor.
    ///
    /// The flag is checked after the guard is taken: either `shutdown` sees
    /// this call and waits for it, or this call sees the flag and refuses.
    async fn begin_work(&self) -> Result<RwLockReadGuard<'_, ()>> {
        let guard = self.in_flight.read().await;
        self.ensure_running()?;
        Ok(guard)
    }

    async fn load(&self, id: &JobId) -> Result<Job> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| JobError::NotFound { id: id.clone() })
    }

    /// Validate a target, check it is reachable and persist a pending job.
    pub async fn create(&self, config: TargetConfig) -> Result<CreateJobResponse> {
        let _work = self.begin_work().await?;

        let target = Target::new(config)?;

        if !self.extractor.validate_target(&target).await {
            warn!(url = %target.url(), extractor = %self.extractor.name(), "Target failed reachability check");
            return Err(JobError::Unreachable {
                url: target.url().to_string(),
            });
        }

        let job = Job::new(target);
        self.store.save(&job).await?;

        info!(job_id = %job.id(), url = %job.target().url(), "Scrape job created");

        Ok(CreateJobResponse {
            job_id: job.id().clone(),
            status: job.status(),
            created_at: job.created_at(),
        })
    }

    /// Run a pending job to completion.
    ///
    /// Only one caller can move a given job out of `Pending`; any other sees
    /// `AlreadyProcessed`. The per-id lock covers load through the `Running`
    /// save and is released before the scrape starts.
    pub async fn execute(&self, id: &JobId) -> Result<ExecuteJobResponse> {
        let _work = self.begin_work().await?;

        let mut job = {
            let _guard = self.locks.lock(id).await;
            self.ensure_running()?;

            let mut job = self.load(id).await?;
            if !job.is_pending() {
                debug!(job_id = %id, status = %job.status(), "Execute refused, job not pending");
                return Err(JobError::AlreadyProcessed {
                    id: id.clone(),
                    status: job.status(),
                });
            }

            job.mark_running()?;
            self.store.save(&job).await?;
            job
        };

        info!(job_id = %id, url = %job.target().url(), "Scrape job started");

        match self.extractor.scrape(job.target()).await {
            Ok(result) => {
                let data = result.data().clone();
                let response_time = result.metadata().response_time;
                job.mark_completed(result)?;
                self.store.save(&job).await?;

                info!(
                    job_id = %id,
                    fields = data.len(),
                    response_time_ms = response_time,
                    "Scrape job completed"
                );

                Ok(ExecuteJobResponse {
                    job_id: id.clone(),
                    status: job.status(),
                    result: Some(data),
                    error: None,
                    completed_at: job.updated_at(),
                })
            }
            Err(e) => {
                job.mark_failed(e.to_string())?;
                self.store.save(&job).await?;

                warn!(job_id = %id, error = %e, "Scrape job failed");

                Ok(ExecuteJobResponse {
                    job_id: id.clone(),
                    status: job.status(),
                    result: None,
                    error: job.error().map(str::to_string),
                    completed_at: job.updated_at(),
                })
            }
        }
    }

    /// Scrape a table in one shot, without creating a job.
    ///
    /// Failures are returned as [`JobError::Scrape`] since there is no job
    /// to record them on.
    pub async fn scrape_table(&self, config: TableConfig) -> Result<TableResult> {
        let _work = self.begin_work().await?;

        let table = TableTarget::new(config)?;
        debug!(url = %table.url(), columns = table.columns().len(), "Table scrape requested");

        let result = self.extractor.scrape_table(&table).await.map_err(|e| {
            warn!(url = %table.url(), error = %e, "Table scrape failed");
            e
        })?;

        info!(url = %result.url(), rows = result.total_rows(), "Table scraped");
        Ok(result)
    }

    /// Read a job.
    pub async fn get(&self, id: &JobId) -> Result<JobView> {
        let job = self.load(id).await?;
        Ok(JobView::from(&job))
    }

    /// All jobs, optionally only those in `status`, oldest first.
    pub async fn list(&self, status: Option<JobStatus>) -> Result<Vec<JobView>> {
        let mut jobs = match status {
            Some(status) => self.store.find_by_status(status).await?,
            None => self.store.find_all().await?,
        };
        jobs.sort_by_key(|job| job.created_at());

        Ok(jobs.iter().map(JobView::from).collect())
    }

    /// Remove a job that is not in flight.
    pub async fn delete(&self, id: &JobId) -> Result<()> {
        let _guard = self.locks.lock(id).await;

        let job = self.load(id).await?;
        if job.is_running() {
            return Err(JobError::NotDeletable {
                id: id.clone(),
                status: job.status(),
            });
        }

        self.store.delete(id).await?;
        info!(job_id = %id, "Scrape job deleted");
        Ok(())
    }

    /// Refuse new work, wait for in-flight extractor calls, then close
    /// the extractor. Later calls are no-ops.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            debug!("Job service already shut down");
            return;
        }

        info!(extractor = %self.extractor.name(), "Shutting down job service");
        let _drained = self.in_flight.write().await;
        self.extractor.close().await;
        info!("Extractor closed");
    }
}
