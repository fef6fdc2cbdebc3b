// src/workflow/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{FandagError, Result};
use crate::workflow::workflow::Workflow;

/// Validate the build-time invariants of a workflow DAG.
///
/// The running core only ever *reads* edges, so these checks run once, at
/// workflow construction/insertion time:
///
/// - at least one job
/// - no edge references an unknown job, no self-edges
/// - edge symmetry: `b.incoming` contains `a` iff `a.outgoing` contains `b`
/// - acyclicity
pub fn validate_workflow(workflow: &Workflow) -> Result<()> {
    ensure_has_jobs(workflow)?;
    validate_edge_references(workflow)?;
    validate_edge_symmetry(workflow)?;
    validate_acyclic(workflow)?;
    Ok(())
}

fn ensure_has_jobs(workflow: &Workflow) -> Result<()> {
    if workflow.jobs.is_empty() {
        return Err(FandagError::ConfigError(format!(
            "workflow '{}' must contain at least one job",
            workflow.id
        )));
    }
    Ok(())
}

fn validate_edge_references(workflow: &Workflow) -> Result<()> {
    for (name, job) in workflow.jobs.iter() {
        for edge in job.incoming.iter().chain(job.outgoing.iter()) {
            if !workflow.jobs.contains_key(edge) {
                return Err(FandagError::ConfigError(format!(
                    "job '{}' references unknown job '{}'",
                    name, edge
                )));
            }
            if edge == name {
                return Err(FandagError::ConfigError(format!(
                    "job '{}' cannot depend on itself",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_edge_symmetry(workflow: &Workflow) -> Result<()> {
    for (name, job) in workflow.jobs.iter() {
        for pred in job.incoming.iter() {
            let pred_job = &workflow.jobs[pred];
            if !pred_job.outgoing.contains(name) {
                return Err(FandagError::ConfigError(format!(
                    "job '{}' lists '{}' as incoming, but '{}' does not list it as outgoing",
                    name, pred, pred
                )));
            }
        }
        for succ in job.outgoing.iter() {
            let succ_job = &workflow.jobs[succ];
            if !succ_job.incoming.contains(name) {
                return Err(FandagError::ConfigError(format!(
                    "job '{}' lists '{}' as outgoing, but '{}' does not list it as incoming",
                    name, succ, succ
                )));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(workflow: &Workflow) -> Result<()> {
    // Build a petgraph graph from the jobs and their edges.
    //
    // Edge direction: predecessor -> job, so for `B.incoming = ["A"]` we add
    // the edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in workflow.jobs.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in workflow.jobs.iter() {
        for pred in job.incoming.iter() {
            graph.add_edge(pred.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(FandagError::DagCycle(format!(
                "cycle detected in workflow '{}' involving job '{}'",
                workflow.id, node
            )))
        }
    }
}
