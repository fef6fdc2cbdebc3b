// src/lib.rs

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod handler;
pub mod lock;
pub mod logging;
pub mod queue;
pub mod store;
pub mod worker;
pub mod workflow;

use tracing::info;

use crate::errors::Result;
use crate::queue::DispatchQueue;
use crate::store::PersistenceGateway;
use crate::workflow::{JobName, Workflow};

/// Validate, persist, and start a workflow.
///
/// Seeds the run by submitting every root job (empty `incoming`) to the
/// dispatch queue; from there, progression is driven entirely by workers'
/// fan-out passes. Root jobs are persisted as `Enqueued` before submission,
/// matching the state machine every other job goes through.
pub async fn start_workflow(
    store: &dyn PersistenceGateway,
    queue: &dyn DispatchQueue,
    workflow: Workflow,
) -> Result<()> {
    workflow.validate()?;

    let workflow_id = workflow.id.clone();
    let roots: Vec<JobName> = workflow.initial_jobs().map(|job| job.name.clone()).collect();

    store.insert_workflow(workflow).await?;

    info!(workflow_id = %workflow_id, ?roots, "starting workflow from root jobs");

    for name in roots {
        let mut job = store.find_job(&workflow_id, &name).await?;
        job.mark_enqueued()?;
        store.persist_job(&workflow_id, &job).await?;
        queue.enqueue(&workflow_id, &name).await?;
    }

    Ok(())
}
