//! Stage scheduler
//!
//! Executes every node of a workflow graph exactly once, respecting edge
//! dependencies. All eligible nodes run concurrently as independent tasks
//! over a shared read-only snapshot of the pipeline state; the scheduler is
//! the single writer that appends each completed node's message to the log.
//! A fan-in node is spawned only once every one of its predecessors has
//! appended, so a researcher can never observe a partial analyst tier.

use fund_core::{Message, PipelineError, PipelineState, Result, Stage, StageId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::error::Elapsed;
use tracing::{debug, info, warn};

use crate::graph::WorkflowGraph;

type StageOutcome = (StageId, std::result::Result<Result<Message>, Elapsed>);

/// Executes a workflow graph to completion over one pipeline state
///
/// Stage implementations are registered by identity before the run. Any
/// node failure (including a timeout) aborts the run, cancels outstanding
/// sibling tasks, and surfaces the error; no partial state is returned.
#[derive(Default)]
pub struct Scheduler {
    stages: HashMap<StageId, Arc<dyn Stage>>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage implementation under its own identity
    ///
    /// Registering the same identity twice replaces the earlier stage.
    pub fn register(&mut self, stage: Arc<dyn Stage>) -> &mut Self {
        self.stages.insert(stage.id(), stage);
        self
    }

    /// Execute all nodes of the graph, producing the final state
    pub async fn run(&self, graph: &WorkflowGraph, state: PipelineState) -> Result<PipelineState> {
        for node in graph.stage_nodes() {
            if !self.stages.contains_key(node) {
                return Err(PipelineError::Configuration(format!(
                    "no stage registered for node {node}"
                )));
            }
        }

        let timeout = state.config().node_timeout;
        let mut remaining: HashMap<StageId, usize> = graph
            .stage_nodes()
            .iter()
            .map(|n| (*n, graph.predecessors(*n).len()))
            .collect();

        let mut state = state;
        let mut tasks: JoinSet<StageOutcome> = JoinSet::new();

        let ready: Vec<StageId> = graph
            .stage_nodes()
            .iter()
            .copied()
            .filter(|n| remaining[n] == 0)
            .collect();
        info!(nodes = graph.stage_nodes().len(), "starting pipeline run");
        self.spawn_ready(&mut tasks, &state, &ready, timeout);

        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            let (node, outcome) = match joined {
                Ok(pair) => pair,
                Err(err) if err.is_cancelled() => continue,
                Err(err) => {
                    tasks.abort_all();
                    return Err(PipelineError::node(
                        "scheduler",
                        format!("stage task failed to join: {err}"),
                    ));
                }
            };

            let message = match outcome {
                Err(_) => {
                    tasks.abort_all();
                    warn!(node = %node, "stage timed out, aborting run");
                    return Err(PipelineError::node(
                        node,
                        format!("no response within {timeout:?}"),
                    ));
                }
                Ok(Err(err)) => {
                    tasks.abort_all();
                    warn!(node = %node, error = %err, "stage failed, aborting run");
                    return Err(err);
                }
                Ok(Ok(message)) => message,
            };

            // A stage speaks only under its own identity.
            if message.producer != node {
                tasks.abort_all();
                return Err(PipelineError::node(
                    node,
                    format!("stage emitted a message as {}", message.producer),
                ));
            }

            debug!(node = %node, "stage completed");
            state.append(message)?;
            completed += 1;

            let mut newly_ready = Vec::new();
            for successor in graph.successors(node) {
                if let Some(count) = remaining.get_mut(&successor) {
                    *count -= 1;
                    if *count == 0 {
                        newly_ready.push(successor);
                    }
                }
            }
            self.spawn_ready(&mut tasks, &state, &newly_ready, timeout);
        }

        if completed != graph.stage_nodes().len() {
            return Err(PipelineError::Configuration(format!(
                "run finished with {completed} of {} nodes executed",
                graph.stage_nodes().len()
            )));
        }
        info!(messages = state.messages().len(), "pipeline run complete");
        Ok(state)
    }

    fn spawn_ready(
        &self,
        tasks: &mut JoinSet<StageOutcome>,
        state: &PipelineState,
        nodes: &[StageId],
        timeout: Duration,
    ) {
        if nodes.is_empty() {
            return;
        }
        // One snapshot per eligibility point, shared read-only by the batch.
        let snapshot = Arc::new(state.clone());
        for node in nodes {
            let Some(stage) = self.stages.get(node) else {
                continue; // coverage validated at run start
            };
            let stage = Arc::clone(stage);
            let snapshot = Arc::clone(&snapshot);
            let id = *node;
            debug!(node = %id, "stage eligible");
            tasks.spawn(async move {
                let outcome = tokio::time::timeout(timeout, stage.run(&snapshot)).await;
                (id, outcome)
            });
        }
    }
}
