// src/worker.rs

//! Worker loop for the channel-backed dispatch queue.
//!
//! Each worker repeatedly pulls a [`JobInvocation`] off the shared receiver
//! and hands it to the coordinator. A failed invocation is logged and the
//! loop moves on; attempt-level retry/backoff policy belongs to real
//! task-queue backends, which observe the propagated `JobFailed` error
//! through their own delivery machinery.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::coordinator::Coordinator;
use crate::queue::JobInvocation;

/// One worker draining the dispatch channel.
///
/// Many workers may share a single receiver; only the idle wait is
/// serialized, execution itself runs concurrently across workers.
pub struct Worker {
    coordinator: Arc<Coordinator>,
    rx: Arc<Mutex<mpsc::Receiver<JobInvocation>>>,
}

impl Worker {
    pub fn new(
        coordinator: Arc<Coordinator>,
        rx: Arc<Mutex<mpsc::Receiver<JobInvocation>>>,
    ) -> Self {
        Self { coordinator, rx }
    }

    /// Pull and execute invocations until the channel closes.
    pub async fn run(self) {
        loop {
            let invocation = {
                let mut rx = self.rx.lock().await;
                rx.recv().await
            };

            let Some(invocation) = invocation else {
                break;
            };

            debug!(
                workflow_id = %invocation.workflow_id,
                job = %invocation.job_name,
                "worker picked up job invocation"
            );

            if let Err(error) = self
                .coordinator
                .execute(&invocation.workflow_id, &invocation.job_name)
                .await
            {
                warn!(
                    workflow_id = %invocation.workflow_id,
                    job = %invocation.job_name,
                    error = %error,
                    "job invocation failed"
                );
            }
        }

        info!("worker loop finished (channel closed)");
    }
}

/// Spawn `count` workers sharing one dispatch receiver.
pub fn spawn_workers(
    count: usize,
    coordinator: Arc<Coordinator>,
    rx: mpsc::Receiver<JobInvocation>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let rx = Arc::new(Mutex::new(rx));

    (0..count)
        .map(|_| {
            let worker = Worker::new(Arc::clone(&coordinator), Arc::clone(&rx));
            tokio::spawn(worker.run())
        })
        .collect()
}
