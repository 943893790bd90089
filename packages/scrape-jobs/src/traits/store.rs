//! Job persistence trait.
//!
//! Backends must give read-your-writes: a `save` is visible to the very next
//! `find_by_id` for that id from any caller. Jobs are stored and returned by
//! value; only the job's own transition methods mutate it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::types::{Job, JobId, JobStatus};

/// Persists and retrieves jobs by id.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or replace a job.
    async fn save(&self, job: &Job) -> StoreResult<()>;

    /// Load a job by id.
    async fn find_by_id(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// All stored jobs, in no particular order.
    async fn find_all(&self) -> StoreResult<Vec<Job>>;

    /// Jobs currently in `status`.
    async fn find_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|job| job.status() == status)
            .collect())
    }

    /// Remove a job. Removing an unknown id is not an error.
    async fn delete(&self, id: &JobId) -> StoreResult<()>;
}

#[async_trait]
impl<S: JobStore + ?Sized> JobStore for Arc<S> {
    async fn save(&self, job: &Job) -> StoreResult<()> {
        (**self).save(job).await
    }

    async fn find_by_id(&self, id: &JobId) -> StoreResult<Option<Job>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Job>> {
        (**self).find_all().await
    }

    async fn find_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        (**self).find_by_status(status).await
    }

    async fn delete(&self, id: &JobId) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
