// src/workflow/job.rs

//! Job record and lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::errors::{FandagError, Result};
use crate::workflow::JobName;

/// Lifecycle state of a job.
///
/// Transitions are monotonic for a single attempt:
/// `Pending -> Enqueued -> Running -> {Finished | Failed}`. Starting straight
/// from `Pending` is allowed (a root job seeded directly into the queue).
/// The only sanctioned backward edge is the explicit retry operation,
/// `Failed -> Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Created, not yet handed to the dispatch queue.
    Pending,
    /// Submitted to the dispatch queue, waiting for a worker.
    Enqueued,
    /// A worker is executing the job body.
    Running,
    /// Job body completed successfully; `output` is recorded.
    Finished,
    /// Job body raised an error; terminal for this pass.
    Failed,
}

impl JobState {
    /// Whether the state is terminal for the current pass.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed)
    }
}

/// One DAG node: a unit of work with declared predecessors and successors.
///
/// The coordinator only reads structure (`incoming`, `outgoing`, `job_type`,
/// `params`) and writes `state`/`output`. Edges are symmetric by
/// construction: `b.incoming` contains `a` iff `a.outgoing` contains `b`
/// (checked in [`validate`](crate::workflow::validate)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique within its workflow; used as a lock key component.
    pub name: JobName,
    /// Opaque identifier selecting which registered handler runs this job.
    pub job_type: String,
    /// Predecessor job names (edges pointing into this job).
    pub incoming: Vec<JobName>,
    /// Successor job names (edges pointing out of this job).
    pub outgoing: Vec<JobName>,
    /// Immutable input payload supplied at workflow construction.
    pub params: serde_json::Value,
    /// Payload produced on successful completion; absent until finished.
    pub output: Option<serde_json::Value>,
    pub state: JobState,
}

impl Job {
    /// Create a new `Pending` job with no edges.
    pub fn new(
        name: impl Into<JobName>,
        job_type: impl Into<String>,
        params: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            job_type: job_type.into(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
            params,
            output: None,
            state: JobState::Pending,
        }
    }

    /// `Pending -> Enqueued`: the job has been submitted to the dispatch
    /// queue. Performed inside the fan-out critical section so concurrent
    /// finishers observe the advancement.
    pub fn mark_enqueued(&mut self) -> Result<()> {
        self.transition(JobState::Enqueued, &[JobState::Pending])
    }

    /// `Enqueued|Pending -> Running`: persisted immediately before the job
    /// body starts executing.
    pub fn mark_started(&mut self) -> Result<()> {
        self.transition(JobState::Running, &[JobState::Enqueued, JobState::Pending])
    }

    /// `Running -> Finished`, recording the produced output.
    pub fn mark_finished(&mut self, output: serde_json::Value) -> Result<()> {
        self.transition(JobState::Finished, &[JobState::Running])?;
        self.output = Some(output);
        Ok(())
    }

    /// `Running -> Failed`: persisted before the triggering error is
    /// re-surfaced to the dispatch layer.
    pub fn mark_failed(&mut self) -> Result<()> {
        self.transition(JobState::Failed, &[JobState::Running])
    }

    /// `Failed -> Pending`: explicit, separately-invoked resurrection for a
    /// manual re-run. Clears any stale output.
    pub fn mark_retried(&mut self) -> Result<()> {
        self.transition(JobState::Pending, &[JobState::Failed])?;
        self.output = None;
        Ok(())
    }

    fn transition(&mut self, to: JobState, allowed_from: &[JobState]) -> Result<()> {
        if !allowed_from.contains(&self.state) {
            return Err(FandagError::InvalidTransition {
                job: self.name.clone(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
