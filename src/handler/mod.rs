// src/handler/mod.rs

//! Polymorphic job bodies.
//!
//! Business logic is opaque to the coordinator: a job record carries a
//! `job_type` tag, and the [`JobRegistry`] maps that tag to a [`JobHandler`].
//! A handler returns a typed outcome, `Ok(output)` or `Err(error)`, and the
//! coordinator decides the state transition from the result, rather than
//! catching unwound panics.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::workflow::{JobName, WorkflowId};

/// Payload projected from one finished predecessor, handed to the job body
/// as part of its execution context.
#[derive(Debug, Clone)]
pub struct IncomingPayload {
    pub name: JobName,
    pub job_type: String,
    pub output: serde_json::Value,
}

/// Execution context for one job-body invocation.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub workflow_id: WorkflowId,
    pub job_name: JobName,
    /// The job's immutable construction-time params.
    pub params: serde_json::Value,
    /// One entry per predecessor, in `incoming` order.
    pub payloads: Vec<IncomingPayload>,
}

/// One unit of business logic, selected by a job's `job_type`.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn perform(&self, ctx: JobContext) -> anyhow::Result<serde_json::Value>;
}

/// Maps `job_type` tags to handlers.
#[derive(Default)]
pub struct JobRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, job_type: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.handlers.insert(job_type.into(), handler);
    }

    pub fn get(&self, job_type: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(job_type).cloned()
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("job_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
