//! Job store: tracks background research and plan runs.
//!
//! The store is an injected collaborator. Nothing in the pipeline keeps
//! module-global state; the server holds an `Arc<dyn JobStore>`.

mod error;
mod job;
mod memory;

pub use error::StoreError;
pub use job::{Job, JobKind, JobStatus, JobUpdate};
pub use memory::{MemoryJobStore, Retention};

use async_trait::async_trait;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new pending job.
    async fn create(&self, kind: JobKind, title: String) -> Result<Job, StoreError>;

    async fn get(&self, id: &str) -> Result<Job, StoreError>;

    /// Apply `update` and return the job as stored afterwards.
    async fn update(&self, id: &str, update: JobUpdate) -> Result<Job, StoreError>;

    /// All jobs, most recently started first.
    async fn list(&self) -> Result<Vec<Job>, StoreError>;
}
