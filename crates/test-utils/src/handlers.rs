use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use fandag::handler::{JobContext, JobHandler, JobRegistry};

/// A handler that:
/// - records each job name it performed, in order
/// - returns `{"done": <job name>}` as output.
pub struct RecordingHandler {
    performed: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    pub fn new(performed: Arc<Mutex<Vec<String>>>) -> Self {
        Self { performed }
    }
}

#[async_trait]
impl JobHandler for RecordingHandler {
    async fn perform(&self, ctx: JobContext) -> anyhow::Result<serde_json::Value> {
        {
            let mut guard = self.performed.lock().unwrap();
            guard.push(ctx.job_name.clone());
        }
        Ok(json!({ "done": ctx.job_name }))
    }
}

/// A handler that always fails with the given message.
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl JobHandler for FailingHandler {
    async fn perform(&self, _ctx: JobContext) -> anyhow::Result<serde_json::Value> {
        Err(anyhow::anyhow!("{}", self.message))
    }
}

/// Registry with a recording handler under `"ok"` and a failing handler
/// under `"boom"`; covers most scenario tests.
pub fn standard_registry(performed: Arc<Mutex<Vec<String>>>) -> JobRegistry {
    let mut registry = JobRegistry::new();
    registry.register("ok", Arc::new(RecordingHandler::new(performed)));
    registry.register("boom", Arc::new(FailingHandler::new("job body exploded")));
    registry
}
