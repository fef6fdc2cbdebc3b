// src/coordinator/executor.rs

//! Coordinator entry point: one `(workflow, job)` invocation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::CoordinatorConfig;
use crate::coordinator::fanout::{self, FanOutOutcome};
use crate::errors::{FandagError, Result};
use crate::handler::{IncomingPayload, JobContext, JobRegistry};
use crate::lock::DistributedMutex;
use crate::queue::DispatchQueue;
use crate::store::PersistenceGateway;
use crate::workflow::{Job, JobName, JobState};

/// Executes jobs and advances their successors.
///
/// One coordinator instance lives in each worker process; every collaborator
/// is injected at construction, and no state is held across invocations.
pub struct Coordinator {
    store: Arc<dyn PersistenceGateway>,
    lock: Arc<dyn DistributedMutex>,
    queue: Arc<dyn DispatchQueue>,
    registry: Arc<JobRegistry>,
    config: CoordinatorConfig,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn PersistenceGateway>,
        lock: Arc<dyn DistributedMutex>,
        queue: Arc<dyn DispatchQueue>,
        registry: Arc<JobRegistry>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            store,
            lock,
            queue,
            registry,
            config,
        }
    }

    /// Execute one job invocation handed over by the dispatch queue.
    ///
    /// Loads the job, gathers predecessor payloads, runs the body, persists
    /// the resulting transition, and on success runs the fan-out protocol
    /// for its successors. A body failure is persisted as `Failed`
    /// *before* the error is returned, so the dispatch layer's retry policy
    /// acts on an already-durable state; fan-out problems never roll back
    /// the job's own success.
    pub async fn execute(&self, workflow_id: &str, job_name: &str) -> Result<()> {
        // A missing record is a dispatch misconfiguration: fatal, no retry.
        let mut job = self.store.find_job(workflow_id, job_name).await?;

        let payloads = self.incoming_payloads(workflow_id, &job).await?;

        job.mark_started()?;
        self.store.persist_job(workflow_id, &job).await?;
        info!(workflow_id, job = %job.name, job_type = %job.job_type, "job started");

        match self.run_body(workflow_id, &job, payloads).await {
            Ok(output) => {
                job.mark_finished(output)?;
                self.store.persist_job(workflow_id, &job).await?;
                info!(workflow_id, job = %job.name, "job finished");

                self.fan_out(workflow_id, &job.outgoing).await;
                Ok(())
            }
            Err(error) => {
                job.mark_failed()?;
                self.store.persist_job(workflow_id, &job).await?;
                warn!(workflow_id, job = %job.name, error = %error, "job failed");

                Err(FandagError::JobFailed {
                    job: job.name.clone(),
                    source: error,
                })
            }
        }
    }

    /// Run the fan-out protocol for the given successor set.
    pub async fn fan_out(
        &self,
        workflow_id: &str,
        outgoing: &[JobName],
    ) -> Vec<(JobName, FanOutOutcome)> {
        fanout::enqueue_outgoing_jobs(
            &*self.store,
            &*self.lock,
            &*self.queue,
            &self.config.fanout,
            workflow_id,
            outgoing,
        )
        .await
    }

    /// Explicitly resurrect a `Failed` job for a manual re-run.
    ///
    /// Transitions `Failed -> Pending`, persists, then runs the same locked
    /// check-and-enqueue as fan-out, so a concurrently finishing predecessor
    /// cannot double-enqueue the job. Successors that never ran are still
    /// `Pending` and need no reset.
    pub async fn retry(&self, workflow_id: &str, job_name: &str) -> Result<FanOutOutcome> {
        let mut job = self.store.find_job(workflow_id, job_name).await?;
        job.mark_retried()?;
        self.store.persist_job(workflow_id, &job).await?;
        info!(workflow_id, job = %job_name, "failed job reset to pending");

        Ok(fanout::enqueue_outgoing_job(
            &*self.store,
            &*self.lock,
            &*self.queue,
            &self.config.fanout,
            workflow_id,
            job_name,
        )
        .await)
    }

    /// Project `{name, type, output}` from each predecessor into the
    /// execution context. Every predecessor must already be `Finished`; a
    /// violation here means the dispatch contract was broken upstream.
    async fn incoming_payloads(
        &self,
        workflow_id: &str,
        job: &Job,
    ) -> Result<Vec<IncomingPayload>> {
        let mut payloads = Vec::with_capacity(job.incoming.len());

        for name in &job.incoming {
            let predecessor = self.store.find_job(workflow_id, name).await?;
            if predecessor.state != JobState::Finished {
                return Err(FandagError::PredecessorNotFinished {
                    job: job.name.clone(),
                    predecessor: name.clone(),
                });
            }
            payloads.push(IncomingPayload {
                name: predecessor.name,
                job_type: predecessor.job_type,
                output: predecessor.output.unwrap_or(serde_json::Value::Null),
            });
        }

        Ok(payloads)
    }

    /// Invoke the registered handler for the job's type. A missing handler
    /// is a body failure, not a crash: the job is marked `Failed` like any
    /// other erroring body.
    async fn run_body(
        &self,
        workflow_id: &str,
        job: &Job,
        payloads: Vec<IncomingPayload>,
    ) -> anyhow::Result<serde_json::Value> {
        let handler = self.registry.get(&job.job_type).ok_or_else(|| {
            anyhow::anyhow!("no handler registered for job type '{}'", job.job_type)
        })?;

        let ctx = JobContext {
            workflow_id: workflow_id.to_string(),
            job_name: job.name.clone(),
            params: job.params.clone(),
            payloads,
        };

        handler.perform(ctx).await
    }
}
