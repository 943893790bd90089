//! In-memory job store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::store::JobStore;
use crate::types::{Job, JobId, JobStatus};

/// In-memory storage for jobs.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
    saves: AtomicUsize,
}

impl MemoryJobStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored jobs.
    pub async fn clear(&self) {
        self.jobs.write().await.clear();
    }

    /// Get the number of stored jobs.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Number of `save` calls since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn save(&self, job: &Job) -> StoreResult<()> {
        self.jobs.write().await.insert(job.id().clone(), job.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|job| job.created_at());
        Ok(jobs)
    }

    async fn find_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status() == status)
            .cloned()
            .collect();
        jobs.sort_by_key(|job| job.created_at());
        Ok(jobs)
    }

    async fn delete(&self, id: &JobId) -> StoreResult<()> {
        self.jobs.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetConfig;

    fn test_job(url: &str) -> Job {
        Job::new(
            TargetConfig::new(url)
                .selector("title", "h1")
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_job_crud() {
        let store = MemoryJobStore::new();
        let job = test_job("https://example.com");

        // Save
        store.save(&job).await.unwrap();
        assert_eq!(store.job_count().await, 1);
        assert_eq!(store.save_count(), 1);

        // Find
        let found = store.find_by_id(job.id()).await.unwrap();
        assert_eq!(found.unwrap().target().url(), "https://example.com");

        // Delete
        store.delete(job.id()).await.unwrap();
        assert_eq!(store.job_count().await, 0);
        assert!(store.find_by_id(job.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_your_writes() {
        let store = MemoryJobStore::new();
        let mut job = test_job("https://example.com");
        store.save(&job).await.unwrap();

        job.mark_running().unwrap();
        store.save(&job).await.unwrap();

        let found = store.find_by_id(job.id()).await.unwrap().unwrap();
        assert!(found.is_running());
    }

    #[tokio::test]
    async fn test_stored_copy_is_isolated_from_caller() {
        let store = MemoryJobStore::new();
        let mut job = test_job("https://example.com");
        store.save(&job).await.unwrap();

        // Mutating the caller's copy without saving leaves the store untouched
        job.mark_running().unwrap();

        let found = store.find_by_id(job.id()).await.unwrap().unwrap();
        assert!(found.is_pending());
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let store = MemoryJobStore::new();
        let pending = test_job("https://a.com");
        let mut running = test_job("https://b.com");
        running.mark_running().unwrap();

        store.save(&pending).await.unwrap();
        store.save(&running).await.unwrap();

        let found = store.find_by_status(JobStatus::Running).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), running.id());

        assert_eq!(store.find_all().await.unwrap().len(), 2);
        assert!(store
            .find_by_status(JobStatus::Completed)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() {
        let store = MemoryJobStore::new();
        store.delete(&JobId::from("missing")).await.unwrap();
    }
}
