// src/coordinator/fanout.rs

//! Race-free successor enqueue.
//!
//! After a job finishes, each of its successors is checked and, if every
//! predecessor is now finished, submitted to the dispatch queue exactly
//! once. Two predecessors of a diamond-shaped DAG can finish within the same
//! instant on different machines; without the lock both would observe "all
//! predecessors finished" and both would enqueue the shared successor. The
//! per-successor mutex serializes them: the second finisher re-checks inside
//! the critical section, finds the successor already `Enqueued`, and does
//! nothing.
//!
//! The critical section covers only "re-read current state + conditionally
//! enqueue", never job execution, so contention windows stay short.

use tracing::{debug, error, warn};

use crate::config::FanOutPolicy;
use crate::coordinator::eligibility::ready_to_start;
use crate::errors::FandagError;
use crate::lock::{DistributedMutex, LockError, LockHandle};
use crate::queue::DispatchQueue;
use crate::store::PersistenceGateway;
use crate::workflow::JobName;

/// Per-successor outcome of one fan-out pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutOutcome {
    /// This pass won the check-and-enqueue; the successor was submitted to
    /// the dispatch queue.
    Enqueued,
    /// The successor was not eligible: a predecessor has not finished yet,
    /// or a concurrent finisher already advanced it. Not an error.
    NotReady,
    /// The lock's retry budget was exhausted; the successor was not enqueued
    /// this pass. Another finishing predecessor's pass will advance it.
    LockUnavailable,
    /// A store or queue error interrupted this successor's pass. Logged;
    /// siblings are unaffected.
    Failed,
}

/// Lock key guarding the check-and-enqueue critical section for one
/// candidate job. Keyed per `(workflow, job)`, not per workflow, so
/// unrelated successors enqueue in parallel.
pub fn fanout_lock_key(workflow_id: &str, job_name: &str) -> String {
    format!("fandag:fanout:{workflow_id}:{job_name}")
}

/// Run the fan-out protocol for every successor of a finished job.
///
/// Successors are processed independently: one successor's lock contention,
/// exhaustion, or backend error never aborts processing of its siblings.
pub(crate) async fn enqueue_outgoing_jobs(
    store: &dyn PersistenceGateway,
    lock: &dyn DistributedMutex,
    queue: &dyn DispatchQueue,
    policy: &FanOutPolicy,
    workflow_id: &str,
    outgoing: &[JobName],
) -> Vec<(JobName, FanOutOutcome)> {
    let mut outcomes = Vec::with_capacity(outgoing.len());

    for successor in outgoing {
        let outcome =
            enqueue_outgoing_job(store, lock, queue, policy, workflow_id, successor).await;
        debug!(
            workflow_id,
            successor = %successor,
            ?outcome,
            "fan-out pass for successor"
        );
        outcomes.push((successor.clone(), outcome));
    }

    outcomes
}

/// Run the locked check-and-enqueue for a single candidate job.
///
/// 1. Fresh pre-check of eligibility; skip without touching the lock when
///    the candidate is clearly not ready.
/// 2. Acquire the per-candidate mutex with a bounded wait; on timeout, retry
///    up to the policy's attempt budget with a fixed backoff.
/// 3. Inside the lock: re-load the candidate, re-evaluate eligibility, and
///    only if still ready mark it `Enqueued`, persist, and submit it to the
///    dispatch queue.
/// 4. Release explicitly; the TTL covers a holder that dies mid-section.
pub(crate) async fn enqueue_outgoing_job(
    store: &dyn PersistenceGateway,
    lock: &dyn DistributedMutex,
    queue: &dyn DispatchQueue,
    policy: &FanOutPolicy,
    workflow_id: &str,
    job_name: &str,
) -> FanOutOutcome {
    // Pre-check outside the lock: a successor with unfinished predecessors,
    // or one already advanced past Pending, is skipped without contending.
    match store.find_job(workflow_id, job_name).await {
        Ok(candidate) => match ready_to_start(store, workflow_id, &candidate).await {
            Ok(true) => {}
            Ok(false) => return FanOutOutcome::NotReady,
            Err(err) => {
                error!(
                    workflow_id,
                    job = %job_name,
                    error = %err,
                    "fan-out pre-check failed"
                );
                return FanOutOutcome::Failed;
            }
        },
        Err(err) => {
            error!(
                workflow_id,
                job = %job_name,
                error = %err,
                "fan-out could not load successor"
            );
            return FanOutOutcome::Failed;
        }
    }

    let handle = match acquire_with_retry(lock, policy, workflow_id, job_name).await {
        Some(handle) => handle,
        None => return FanOutOutcome::LockUnavailable,
    };

    let outcome = locked_check_and_enqueue(store, queue, workflow_id, job_name).await;

    if let Err(err) = lock.release(handle).await {
        // The TTL will reap the entry; nothing else to do.
        warn!(
            workflow_id,
            job = %job_name,
            error = %err,
            "failed to release fan-out lock"
        );
    }

    match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                workflow_id,
                job = %job_name,
                error = %err,
                "fan-out critical section failed"
            );
            FanOutOutcome::Failed
        }
    }
}

/// Bounded lock acquisition: each attempt polls for `policy.lock_wait`, and
/// exhausted attempts mean "not enqueued this pass", never an error.
async fn acquire_with_retry(
    lock: &dyn DistributedMutex,
    policy: &FanOutPolicy,
    workflow_id: &str,
    job_name: &str,
) -> Option<LockHandle> {
    let key = fanout_lock_key(workflow_id, job_name);

    for attempt in 1..=policy.retry_attempts {
        match lock.acquire(&key, policy.lock_wait, policy.lock_ttl).await {
            Ok(handle) => return Some(handle),
            Err(LockError::Timeout { .. }) => {
                if attempt == policy.retry_attempts {
                    break;
                }
                debug!(
                    workflow_id,
                    job = %job_name,
                    attempt,
                    "fan-out lock busy; backing off"
                );
                tokio::time::sleep(policy.retry_backoff).await;
            }
            Err(err) => {
                error!(
                    workflow_id,
                    job = %job_name,
                    error = %err,
                    "fan-out lock backend error"
                );
                return None;
            }
        }
    }

    warn!(
        workflow_id,
        job = %job_name,
        attempts = policy.retry_attempts,
        "fan-out lock budget exhausted; successor not enqueued this pass"
    );
    None
}

/// The critical section: double-check eligibility on a fresh read, then
/// advance and submit. Time passed between the pre-check and lock
/// acquisition, so a concurrent finisher may already have advanced the
/// candidate.
async fn locked_check_and_enqueue(
    store: &dyn PersistenceGateway,
    queue: &dyn DispatchQueue,
    workflow_id: &str,
    job_name: &str,
) -> Result<FanOutOutcome, FandagError> {
    let mut candidate = store.find_job(workflow_id, job_name).await?;

    if !ready_to_start(store, workflow_id, &candidate).await? {
        return Ok(FanOutOutcome::NotReady);
    }

    // Persist `Enqueued` before submitting: the persisted state is what makes
    // the double-check observable to the losing finisher.
    candidate.mark_enqueued()?;
    store.persist_job(workflow_id, &candidate).await?;
    queue.enqueue(workflow_id, job_name).await?;

    Ok(FanOutOutcome::Enqueued)
}
