// src/queue/mod.rs

//! Dispatch queue abstraction.
//!
//! Workers receive `(workflow, job)` pairs from a shared task queue; the
//! coordinator only ever *submits* to it. The queue is assumed to deliver
//! each submission to at most one worker; the fan-out protocol guarantees
//! at most one submission per eligible job, and the combination yields
//! exactly-once dispatch.
//!
//! [`channel::ChannelQueue`] is the in-process reference backend; real
//! deployments wrap an external task-queue client.

pub mod channel;

use async_trait::async_trait;
use thiserror::Error;

use crate::workflow::{JobName, WorkflowId};

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("dispatch queue closed")]
    Closed,

    #[error("dispatch queue backend error: {0}")]
    Backend(String),
}

/// One schedulable unit of work: run `job_name` of `workflow_id` on some
/// worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInvocation {
    pub workflow_id: WorkflowId,
    pub job_name: JobName,
}

/// Submission side of the task queue.
#[async_trait]
pub trait DispatchQueue: Send + Sync {
    /// Submit a job for asynchronous execution on some worker.
    async fn enqueue(&self, workflow_id: &str, job_name: &str) -> Result<(), QueueError>;
}

pub use channel::ChannelQueue;
