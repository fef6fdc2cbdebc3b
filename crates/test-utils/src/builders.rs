#![allow(dead_code)]

use serde_json::Value;

use fandag::workflow::{Job, JobState, Workflow};

/// Builder for `Workflow` to simplify test setup.
///
/// Edges are declared once via [`WorkflowBuilder::edge`] and written to both
/// sides (`outgoing` on the predecessor, `incoming` on the successor), so the
/// symmetry invariant holds by construction.
pub struct WorkflowBuilder {
    workflow: Workflow,
}

impl WorkflowBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            workflow: Workflow::new(id),
        }
    }

    pub fn with_job(mut self, name: &str, job: Job) -> Self {
        let mut job = job;
        job.name = name.to_string();
        self.workflow.jobs.insert(name.to_string(), job);
        self
    }

    /// Shorthand: add a job of the given type with null params.
    pub fn job(self, name: &str, job_type: &str) -> Self {
        let job = JobBuilder::new(job_type).build();
        self.with_job(name, job)
    }

    /// Add a dependency edge `from -> to`; both jobs must already exist.
    pub fn edge(mut self, from: &str, to: &str) -> Self {
        {
            let from_job = self
                .workflow
                .jobs
                .get_mut(from)
                .unwrap_or_else(|| panic!("unknown edge source '{from}'"));
            from_job.outgoing.push(to.to_string());
        }
        {
            let to_job = self
                .workflow
                .jobs
                .get_mut(to)
                .unwrap_or_else(|| panic!("unknown edge target '{to}'"));
            to_job.incoming.push(from.to_string());
        }
        self
    }

    pub fn build(self) -> Workflow {
        self.workflow
            .validate()
            .expect("Failed to build valid workflow from builder");
        self.workflow
    }

    /// Build without validating, for tests that exercise the validator.
    pub fn build_unchecked(self) -> Workflow {
        self.workflow
    }
}

/// Builder for `Job`.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(job_type: &str) -> Self {
        Self {
            // The name is assigned by `WorkflowBuilder::with_job`.
            job: Job::new("", job_type, Value::Null),
        }
    }

    pub fn params(mut self, params: Value) -> Self {
        self.job.params = params;
        self
    }

    pub fn state(mut self, state: JobState) -> Self {
        self.job.state = state;
        self
    }

    pub fn output(mut self, output: Value) -> Self {
        self.job.output = Some(output);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}
