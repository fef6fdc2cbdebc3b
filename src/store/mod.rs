// src/store/mod.rs

//! Persistence gateway abstraction.
//!
//! The coordinator talks to a [`PersistenceGateway`] instead of a concrete
//! database client, injected at construction so tests can substitute the
//! in-memory implementation in [`memory`].
//!
//! Contract required of any backend:
//! - `persist_job` overwrites a job's `state`/`output` fields as one atomic
//!   single-record write,
//! - `find_job` has at least read-your-writes consistency for a single
//!   record, because eligibility checks on other workers must observe a
//!   finished predecessor immediately.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::workflow::{Job, Workflow};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("job '{job}' not found in workflow '{workflow_id}'")]
    JobNotFound { workflow_id: String, job: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read/write access to workflow and job records.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Insert a freshly built workflow and all of its jobs.
    async fn insert_workflow(&self, workflow: Workflow) -> Result<(), StoreError>;

    /// Load a whole workflow (used for status derivation and diagnostics,
    /// never by the fan-out hot path).
    async fn find_workflow(&self, workflow_id: &str) -> Result<Workflow, StoreError>;

    /// Load one job record. Always a fresh read; callers must not cache the
    /// result across eligibility decisions.
    async fn find_job(&self, workflow_id: &str, name: &str) -> Result<Job, StoreError>;

    /// Overwrite one job record (state/output fields).
    async fn persist_job(&self, workflow_id: &str, job: &Job) -> Result<(), StoreError>;
}

pub use memory::MemoryGateway;
