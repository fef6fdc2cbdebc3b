// src/coordinator/eligibility.rs

//! Dependency-satisfaction predicate.

use crate::store::{PersistenceGateway, StoreError};
use crate::workflow::{Job, JobState};

/// Whether `job` may be handed to the dispatch queue right now.
///
/// True iff the job is still `Pending` and every predecessor's freshly-read
/// state is `Finished`. The state check makes the predicate idempotent: a
/// successor that was already advanced by a concurrent finisher (enqueued,
/// running, or beyond) yields `false`, so re-evaluation can never cause a
/// duplicate enqueue.
///
/// This is the canonical implementation of eligibility. Predecessor states
/// are mutated concurrently by other workers, so every check reads from the
/// store (never from a cached `Workflow` snapshot), and the fan-out protocol
/// re-evaluates it *inside* the critical section, not only before acquiring
/// the lock.
pub async fn ready_to_start(
    store: &dyn PersistenceGateway,
    workflow_id: &str,
    job: &Job,
) -> Result<bool, StoreError> {
    if job.state != JobState::Pending {
        return Ok(false);
    }

    for name in &job.incoming {
        let predecessor = store.find_job(workflow_id, name).await?;
        if predecessor.state != JobState::Finished {
            return Ok(false);
        }
    }

    Ok(true)
}
