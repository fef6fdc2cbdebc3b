#![allow(dead_code)]

use std::time::Duration;

pub use fandag_test_utils::{init_tracing, with_timeout};

use fandag::config::{CoordinatorConfig, FanOutPolicy};
use fandag::store::PersistenceGateway;
use fandag::workflow::Workflow;

/// Coordinator config with small budgets so contention tests finish quickly.
pub fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig {
        fanout: FanOutPolicy {
            lock_wait: Duration::from_millis(250),
            lock_ttl: Duration::from_secs(2),
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(20),
        },
    }
}

/// Poll the store until `predicate` holds for the workflow, or panic after
/// three seconds with a dump of the job states.
pub async fn wait_until<F>(
    store: &dyn PersistenceGateway,
    workflow_id: &str,
    description: &str,
    predicate: F,
) where
    F: Fn(&Workflow) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);

    loop {
        let workflow = store
            .find_workflow(workflow_id)
            .await
            .expect("workflow should exist");

        if predicate(&workflow) {
            return;
        }

        if tokio::time::Instant::now() >= deadline {
            let states: Vec<_> = workflow
                .jobs
                .values()
                .map(|job| (job.name.clone(), job.state))
                .collect();
            panic!("workflow '{workflow_id}' never reached '{description}'; job states: {states:?}");
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
