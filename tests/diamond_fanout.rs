// tests/diamond_fanout.rs

//! Scenario B: a diamond `A -> {B, C} -> D` where both middle jobs finish
//! within the same instant. Exactly one fan-out pass may enqueue `D`; the
//! other must observe the advancement inside the lock and do nothing.

mod common;
use crate::common::{fast_config, init_tracing, wait_until};

use std::error::Error;
use std::sync::{Arc, Mutex};

use serde_json::json;

use fandag::coordinator::{Coordinator, FanOutOutcome};
use fandag::lock::MemoryMutex;
use fandag::queue::ChannelQueue;
use fandag::start_workflow;
use fandag::store::{MemoryGateway, PersistenceGateway};
use fandag::worker::spawn_workers;
use fandag::workflow::{JobState, WorkflowStatus};
use fandag_test_utils::builders::{JobBuilder, WorkflowBuilder};
use fandag_test_utils::fakes::RecordingQueue;
use fandag_test_utils::handlers::standard_registry;

type TestResult = Result<(), Box<dyn Error>>;

/// Diamond with A, B, C already finished and D still pending: the store state
/// both finishers observe the moment they start their fan-out passes.
fn finished_middle_diamond() -> fandag::workflow::Workflow {
    let done = |job_type: &str| {
        JobBuilder::new(job_type)
            .state(JobState::Finished)
            .output(json!({}))
            .build()
    };

    WorkflowBuilder::new("wf-diamond")
        .with_job("A", done("ok"))
        .with_job("B", done("ok"))
        .with_job("C", done("ok"))
        .job("D", "ok")
        .edge("A", "B")
        .edge("A", "C")
        .edge("B", "D")
        .edge("C", "D")
        .build()
}

#[tokio::test]
async fn concurrent_finishers_enqueue_shared_successor_exactly_once() -> TestResult {
    init_tracing();

    let store = Arc::new(MemoryGateway::new());
    let lock = Arc::new(MemoryMutex::new());
    let queue = Arc::new(RecordingQueue::new());

    store.insert_workflow(finished_middle_diamond()).await?;

    let performed = Arc::new(Mutex::new(Vec::new()));
    let coordinator = Arc::new(Coordinator::new(
        store.clone(),
        lock,
        queue.clone(),
        Arc::new(standard_registry(performed)),
        fast_config(),
    ));

    // B's and C's fan-out passes, racing for D.
    let outgoing = vec!["D".to_string()];
    let (from_b, from_c) = tokio::join!(
        coordinator.fan_out("wf-diamond", &outgoing),
        coordinator.fan_out("wf-diamond", &outgoing),
    );

    assert_eq!(queue.job_names(), vec!["D".to_string()]);

    let outcomes = [from_b[0].1, from_c[0].1];
    assert!(outcomes.contains(&FanOutOutcome::Enqueued));
    assert!(outcomes.contains(&FanOutOutcome::NotReady));

    let d = store.find_job("wf-diamond", "D").await?;
    assert_eq!(d.state, JobState::Enqueued);

    Ok(())
}

#[tokio::test]
async fn repeated_fanout_on_advanced_successor_is_a_noop() -> TestResult {
    init_tracing();

    let store = Arc::new(MemoryGateway::new());
    let lock = Arc::new(MemoryMutex::new());
    let queue = Arc::new(RecordingQueue::new());

    store.insert_workflow(finished_middle_diamond()).await?;

    let performed = Arc::new(Mutex::new(Vec::new()));
    let coordinator = Arc::new(Coordinator::new(
        store.clone(),
        lock,
        queue.clone(),
        Arc::new(standard_registry(performed)),
        fast_config(),
    ));

    let outgoing = vec!["D".to_string()];
    let first = coordinator.fan_out("wf-diamond", &outgoing).await;
    assert_eq!(first[0].1, FanOutOutcome::Enqueued);

    // A late finisher re-running the pass observes D already advanced.
    let second = coordinator.fan_out("wf-diamond", &outgoing).await;
    assert_eq!(second[0].1, FanOutOutcome::NotReady);

    assert_eq!(queue.job_names(), vec!["D".to_string()]);

    Ok(())
}

#[tokio::test]
async fn diamond_runs_end_to_end_with_concurrent_workers() -> TestResult {
    init_tracing();

    let workflow = WorkflowBuilder::new("wf-diamond-e2e")
        .job("A", "ok")
        .job("B", "ok")
        .job("C", "ok")
        .job("D", "ok")
        .edge("A", "B")
        .edge("A", "C")
        .edge("B", "D")
        .edge("C", "D")
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
    let workers = spawn_workers(4, coordinator, rx);

    wait_until(&*store, "wf-diamond-e2e", "all jobs finished", |wf| {
        wf.status() == WorkflowStatus::Finished
    })
    .await;

    for worker in &workers {
        worker.abort();
    }

    let order = performed.lock().unwrap().clone();
    assert_eq!(order.len(), 4, "each job performed exactly once: {order:?}");
    assert_eq!(order[0], "A");
    assert_eq!(order[3], "D");

    Ok(())
}
