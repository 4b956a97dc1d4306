//! In-process job store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::job::{Job, JobKind, JobUpdate};
use crate::{JobStore, StoreError};

/// Bounds on finished jobs. Pending and running jobs are never evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub max_finished: usize,
    pub finished_ttl: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            max_finished: 200,
            finished_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// `HashMap` behind a tokio `RwLock`. Finished jobs are evicted by
/// [`Retention`] whenever a job is created or finishes.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
    retention: Retention,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Retention) -> Self {
        Self {
            jobs: RwLock::default(),
            retention,
        }
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    fn prune(&self, jobs: &mut HashMap<String, Job>, now: DateTime<Utc>) {
        let before = jobs.len();
        let ttl = chrono::Duration::from_std(self.retention.finished_ttl)
            .unwrap_or(chrono::Duration::MAX);
        jobs.retain(|_, j| !j.status.is_finished() || now - j.updated_at <= ttl);

        let mut finished: Vec<(DateTime<Utc>, String)> = jobs
            .values()
            .filter(|j| j.status.is_finished())
            .map(|j| (j.updated_at, j.id.clone()))
            .collect();
        if finished.len() > self.retention.max_finished {
            finished.sort();
            let excess = finished.len() - self.retention.max_finished;
            for (_, id) in finished.into_iter().take(excess) {
                jobs.remove(&id);
            }
        }

        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(evicted, retained = jobs.len(), "pruned finished jobs");
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, kind: JobKind, title: String) -> Result<Job, StoreError> {
        let id = format!("job-{}", uuid::Uuid::new_v4());
        let now = Utc::now();
        let job = Job::new(id.clone(), kind, title, now);
        let mut jobs = self.jobs.write().await;
        self.prune(&mut jobs, now);
        jobs.insert(id.clone(), job.clone());
        debug!(job_id = %id, kind = kind.as_str(), "job created");
        Ok(job)
    }

    async fn get(&self, id: &str) -> Result<Job, StoreError> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if job.status.is_finished() {
            return Err(StoreError::Finished(id.to_string()));
        }
        let now = Utc::now();
        job.apply(update, now);
        debug!(job_id = %id, progress = job.progress, status = ?job.status, "job updated");
        let updated = job.clone();
        if updated.status.is_finished() {
            self.prune(&mut jobs, now);
        }
        Ok(updated)
    }

    async fn list(&self) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(jobs)
    }
}
