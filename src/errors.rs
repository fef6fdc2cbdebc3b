// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

use crate::queue::QueueError;
use crate::store::StoreError;
use crate::workflow::JobState;

#[derive(Error, Debug)]
pub enum FandagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("job '{job}' not found in workflow '{workflow_id}'")]
    JobNotFound { workflow_id: String, job: String },

    #[error("invalid state transition for job '{job}': {from:?} -> {to:?}")]
    InvalidTransition {
        job: String,
        from: JobState,
        to: JobState,
    },

    #[error("job '{job}' dispatched before predecessor '{predecessor}' finished")]
    PredecessorNotFinished { job: String, predecessor: String },

    #[error("job '{job}' failed: {source}")]
    JobFailed {
        job: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("storage backend error: {0}")]
    StorageError(String),

    #[error("dispatch queue error: {0}")]
    QueueError(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StoreError> for FandagError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WorkflowNotFound(id) => FandagError::WorkflowNotFound(id),
            StoreError::JobNotFound { workflow_id, job } => {
                FandagError::JobNotFound { workflow_id, job }
            }
            StoreError::Backend(msg) => FandagError::StorageError(msg),
        }
    }
}

impl From<QueueError> for FandagError {
    fn from(err: QueueError) -> Self {
        FandagError::QueueError(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FandagError>;
