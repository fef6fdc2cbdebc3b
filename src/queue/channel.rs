// src/queue/channel.rs

//! mpsc-backed dispatch queue.
//!
//! The in-process reference backend: `enqueue` forwards invocations over a
//! tokio channel whose receiving end is drained by [`Worker`] loops. Cloning
//! the queue clones the sender, so many coordinators can submit to the same
//! channel.
//!
//! [`Worker`]: crate::worker::Worker

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::queue::{DispatchQueue, JobInvocation, QueueError};

#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::Sender<JobInvocation>,
}

impl ChannelQueue {
    /// Create a queue with the given channel capacity, returning the
    /// receiving end for worker loops to drain.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobInvocation>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DispatchQueue for ChannelQueue {
    async fn enqueue(&self, workflow_id: &str, job_name: &str) -> Result<(), QueueError> {
        self.tx
            .send(JobInvocation {
                workflow_id: workflow_id.to_string(),
                job_name: job_name.to_string(),
            })
            .await
            .map_err(|_| QueueError::Closed)
    }
}
