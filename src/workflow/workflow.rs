// src/workflow/workflow.rs

//! Workflow record: one DAG instance grouping jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::workflow::job::{Job, JobState};
use crate::workflow::{JobName, WorkflowId};

/// Derived run status of a workflow. Never stored; recomputed from the
/// persisted job states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// At least one job has not reached a terminal state yet.
    Running,
    /// Every job is `Finished`.
    Finished,
    /// At least one job is `Failed`. Progression along its outgoing edges has
    /// halted; unrelated branches may still be running or finished.
    Failed,
}

/// One DAG instance. The workflow owns its jobs; a job has no existence
/// outside a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    /// Jobs keyed by name (unique within the workflow).
    pub jobs: BTreeMap<JobName, Job>,
}

impl Workflow {
    pub fn new(id: impl Into<WorkflowId>) -> Self {
        Self {
            id: id.into(),
            jobs: BTreeMap::new(),
        }
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.get(name)
    }

    /// Jobs with no predecessors; these seed the run at start time.
    pub fn initial_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter(|job| job.incoming.is_empty())
    }

    /// Derive the workflow status from current job states.
    pub fn status(&self) -> WorkflowStatus {
        let mut all_finished = true;
        for job in self.jobs.values() {
            match job.state {
                JobState::Failed => return WorkflowStatus::Failed,
                JobState::Finished => {}
                _ => all_finished = false,
            }
        }
        if all_finished {
            WorkflowStatus::Finished
        } else {
            WorkflowStatus::Running
        }
    }

    /// Check the build-time DAG invariants. See [`validate`](super::validate).
    pub fn validate(&self) -> Result<()> {
        super::validate::validate_workflow(self)
    }
}
