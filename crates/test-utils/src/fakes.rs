use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use fandag::lock::{DistributedMutex, LockError, LockHandle};
use fandag::queue::{DispatchQueue, JobInvocation, QueueError};

/// A fake dispatch queue that records submissions without delivering them.
///
/// Lets fan-out tests assert exactly-once enqueue directly, with no workers
/// in the picture.
#[derive(Default)]
pub struct RecordingQueue {
    enqueued: Mutex<Vec<JobInvocation>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> Vec<JobInvocation> {
        self.enqueued.lock().unwrap().clone()
    }

    /// Names of enqueued jobs, in submission order.
    pub fn job_names(&self) -> Vec<String> {
        self.enqueued
            .lock()
            .unwrap()
            .iter()
            .map(|inv| inv.job_name.clone())
            .collect()
    }
}

#[async_trait]
impl DispatchQueue for RecordingQueue {
    async fn enqueue(&self, workflow_id: &str, job_name: &str) -> Result<(), QueueError> {
        let mut guard = self.enqueued.lock().unwrap();
        guard.push(JobInvocation {
            workflow_id: workflow_id.to_string(),
            job_name: job_name.to_string(),
        });
        Ok(())
    }
}

/// A mutex whose `acquire` always times out immediately.
///
/// Fault injection for the fan-out retry loop: with zero backoff the whole
/// budget is exhausted without any real delay.
#[derive(Default)]
pub struct UnavailableMutex {
    attempts: Mutex<Vec<String>>,
}

impl UnavailableMutex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys passed to `acquire`, one entry per attempt.
    pub fn attempted_keys(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DistributedMutex for UnavailableMutex {
    async fn acquire(
        &self,
        key: &str,
        _wait_budget: Duration,
        _hold_ttl: Duration,
    ) -> Result<LockHandle, LockError> {
        self.attempts.lock().unwrap().push(key.to_string());
        Err(LockError::Timeout {
            key: key.to_string(),
            waited_ms: 0,
        })
    }

    async fn release(&self, _handle: LockHandle) -> Result<(), LockError> {
        Ok(())
    }
}
