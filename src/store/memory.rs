// src/store/memory.rs

//! In-memory persistence gateway.
//!
//! Reference implementation of [`PersistenceGateway`] used by tests and by
//! embedded single-process deployments. All reads return clones, so callers
//! always observe a snapshot taken at read time, and every `persist_job` is
//! one atomic map update.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{PersistenceGateway, StoreError};
use crate::workflow::{Job, Workflow, WorkflowId};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    workflows: RwLock<HashMap<WorkflowId, Workflow>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn insert_workflow(&self, workflow: Workflow) -> Result<(), StoreError> {
        let mut workflows = self.workflows.write().await;
        workflows.insert(workflow.id.clone(), workflow);
        Ok(())
    }

    async fn find_workflow(&self, workflow_id: &str) -> Result<Workflow, StoreError> {
        let workflows = self.workflows.read().await;
        workflows
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| StoreError::WorkflowNotFound(workflow_id.to_string()))
    }

    async fn find_job(&self, workflow_id: &str, name: &str) -> Result<Job, StoreError> {
        let workflows = self.workflows.read().await;
        let workflow = workflows
            .get(workflow_id)
            .ok_or_else(|| StoreError::WorkflowNotFound(workflow_id.to_string()))?;
        workflow
            .jobs
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound {
                workflow_id: workflow_id.to_string(),
                job: name.to_string(),
            })
    }

    async fn persist_job(&self, workflow_id: &str, job: &Job) -> Result<(), StoreError> {
        let mut workflows = self.workflows.write().await;
        let workflow = workflows
            .get_mut(workflow_id)
            .ok_or_else(|| StoreError::WorkflowNotFound(workflow_id.to_string()))?;
        if !workflow.jobs.contains_key(&job.name) {
            return Err(StoreError::JobNotFound {
                workflow_id: workflow_id.to_string(),
                job: job.name.clone(),
            });
        }
        workflow.jobs.insert(job.name.clone(), job.clone());
        Ok(())
    }
}
