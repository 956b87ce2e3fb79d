//! Workflow graph construction
//!
//! The graph is built fresh for every run from the caller-selected analyst
//! list and is never mutated once the scheduler begins execution. There is
//! no global graph value anywhere; construction returns an immutable value.

use fund_core::{AnalystId, PipelineError, Result, StageId};
use std::collections::HashSet;

/// A graph vertex: a schedulable stage or the end sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Stage(StageId),
    End,
}

/// The directed acyclic dependency graph for one pipeline run
///
/// Shape: one fixed entry node, one node per selected analyst, a double
/// fan-in to the two researchers (each analyst feeds both), and the fixed
/// downstream chain terminating at [`Node::End`].
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    nodes: Vec<StageId>,
    edges: Vec<(StageId, Node)>,
}

impl WorkflowGraph {
    /// Build the graph for the given analyst selection
    ///
    /// The selection must be non-empty and duplicate-free; either violation
    /// fails construction before any node executes.
    pub fn build(selection: &[AnalystId]) -> Result<Self> {
        if selection.is_empty() {
            return Err(PipelineError::Configuration(
                "analyst selection is empty; select at least one analysis unit".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for analyst in selection {
            if !seen.insert(*analyst) {
                return Err(PipelineError::Configuration(format!(
                    "analyst '{analyst}' selected more than once"
                )));
            }
        }

        let mut nodes = vec![StageId::MarketData];
        nodes.extend(selection.iter().map(|a| StageId::Analyst(*a)));
        nodes.extend([
            StageId::BullResearcher,
            StageId::BearResearcher,
            StageId::DebateRoom,
            StageId::RiskManager,
            StageId::PortfolioManager,
        ]);

        let mut edges = Vec::new();
        for analyst in selection {
            let analyst = StageId::Analyst(*analyst);
            // Entry fan-out, then double fan-in: each analyst feeds both
            // researchers independently.
            edges.push((StageId::MarketData, Node::Stage(analyst)));
            edges.push((analyst, Node::Stage(StageId::BullResearcher)));
            edges.push((analyst, Node::Stage(StageId::BearResearcher)));
        }
        edges.push((StageId::BullResearcher, Node::Stage(StageId::DebateRoom)));
        edges.push((StageId::BearResearcher, Node::Stage(StageId::DebateRoom)));
        edges.push((StageId::DebateRoom, Node::Stage(StageId::RiskManager)));
        edges.push((StageId::RiskManager, Node::Stage(StageId::PortfolioManager)));
        edges.push((StageId::PortfolioManager, Node::End));

        Ok(Self { nodes, edges })
    }

    /// The fixed entry node
    pub fn entry(&self) -> StageId {
        StageId::MarketData
    }

    /// All schedulable nodes, entry first
    pub fn stage_nodes(&self) -> &[StageId] {
        &self.nodes
    }

    /// All directed edges
    pub fn edges(&self) -> &[(StageId, Node)] {
        &self.edges
    }

    /// Stages that must complete before `node` becomes eligible
    pub fn predecessors(&self, node: StageId) -> Vec<StageId> {
        self.edges
            .iter()
            .filter(|(_, to)| *to == Node::Stage(node))
            .map(|(from, _)| *from)
            .collect()
    }

    /// Stages unblocked (in part) by completion of `node`
    pub fn successors(&self, node: StageId) -> Vec<StageId> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == node)
            .filter_map(|(_, to)| match to {
                Node::Stage(id) => Some(*id),
                Node::End => None,
            })
            .collect()
    }
}
