// tests/linear_chain.rs

//! Scenario A: a linear chain `A -> B -> C` runs to completion, each job
//! enqueued by its predecessor's fan-out pass.

mod common;
use crate::common::{fast_config, init_tracing, wait_until};

use std::error::Error;
use std::sync::{Arc, Mutex};

use fandag::coordinator::Coordinator;
use fandag::handler::{JobContext, JobHandler, JobRegistry};
use fandag::lock::MemoryMutex;
use fandag::queue::ChannelQueue;
use fandag::start_workflow;
use fandag::store::{MemoryGateway, PersistenceGateway};
use fandag::worker::spawn_workers;
use fandag::workflow::{JobState, WorkflowStatus};
use fandag_test_utils::builders::WorkflowBuilder;
use fandag_test_utils::handlers::standard_registry;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn linear_chain_runs_to_completion() -> TestResult {
    init_tracing();

    let workflow = WorkflowBuilder::new("wf-chain")
        .job("A", "ok")
        .job("B", "ok")
        .job("C", "ok")
        .edge("A", "B")
        .edge("B", "C")
        .build();

    let store = Arc::new(MemoryGateway::new());
    let lock = Arc::new(MemoryMutex::new());
    let (queue, rx) = ChannelQueue::new(16);
    let queue = Arc::new(queue);

    let performed = Arc::new(Mutex::new(Vec::new()));
    let registry = Arc::new(standard_registry(performed.clone()));

    let coordinator = Arc::new(Coordinator::new(
        store.clone(),
        lock,
        queue.clone(),
        registry,
        fast_config(),
    ));

    start_workflow(&*store, &*queue, workflow).await?;
    let workers = spawn_workers(2, coordinator, rx);

    wait_until(&*store, "wf-chain", "all jobs finished", |wf| {
        wf.status() == WorkflowStatus::Finished
    })
    .await;

    for worker in &workers {
        worker.abort();
    }

    let order = performed.lock().unwrap().clone();
    assert_eq!(order, vec!["A".to_string(), "B".to_string(), "C".to_string()]);

    let finished = store.find_workflow("wf-chain").await?;
    for job in finished.jobs.values() {
        assert_eq!(job.state, JobState::Finished);
        assert!(job.output.is_some(), "job '{}' has no output", job.name);
    }

    Ok(())
}

/// Records every context it is invoked with.
struct CaptureHandler {
    contexts: Arc<Mutex<Vec<JobContext>>>,
}

#[async_trait::async_trait]
impl JobHandler for CaptureHandler {
    async fn perform(&self, ctx: JobContext) -> anyhow::Result<serde_json::Value> {
        let output = serde_json::json!({ "seen": ctx.payloads.len() });
        self.contexts.lock().unwrap().push(ctx);
        Ok(output)
    }
}

#[tokio::test]
async fn successor_receives_predecessor_payloads() -> TestResult {
    init_tracing();

    let workflow = WorkflowBuilder::new("wf-payloads")
        .job("A", "capture")
        .job("B", "capture")
        .edge("A", "B")
        .build();

    let store = Arc::new(MemoryGateway::new());
    let lock = Arc::new(MemoryMutex::new());
    let (queue, rx) = ChannelQueue::new(16);
    let queue = Arc::new(queue);

    let contexts = Arc::new(Mutex::new(Vec::new()));
    let mut registry = JobRegistry::new();
    registry.register(
        "capture",
        Arc::new(CaptureHandler {
            contexts: contexts.clone(),
        }),
    );

    let coordinator = Arc::new(Coordinator::new(
        store.clone(),
        lock,
        queue.clone(),
        Arc::new(registry),
        fast_config(),
    ));

    start_workflow(&*store, &*queue, workflow).await?;
    let workers = spawn_workers(1, coordinator, rx);

    wait_until(&*store, "wf-payloads", "all jobs finished", |wf| {
        wf.status() == WorkflowStatus::Finished
    })
    .await;

    for worker in &workers {
        worker.abort();
    }

    let contexts = contexts.lock().unwrap();
    assert_eq!(contexts.len(), 2);

    // A is a root: no payloads.
    let a_ctx = contexts.iter().find(|c| c.job_name == "A").unwrap();
    assert!(a_ctx.payloads.is_empty());

    // B sees exactly A's projected {name, type, output}.
    let b_ctx = contexts.iter().find(|c| c.job_name == "B").unwrap();
    assert_eq!(b_ctx.payloads.len(), 1);
    assert_eq!(b_ctx.payloads[0].name, "A");
    assert_eq!(b_ctx.payloads[0].job_type, "capture");
    assert_eq!(b_ctx.payloads[0].output, serde_json::json!({ "seen": 0 }));

    Ok(())
}
