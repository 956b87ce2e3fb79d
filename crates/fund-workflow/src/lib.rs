//! Workflow orchestration for the trading pipeline
//!
//! This crate builds the per-run execution graph from the caller-selected
//! analyst set and schedules it: the entry node fans out to every selected
//! analyst, both researchers wait on the full analyst tier (a hard
//! synchronization barrier, not a race), and the downstream chain runs the
//! debate, risk, and portfolio stages to the end sentinel.

pub mod graph;
pub mod scheduler;

pub use graph::{Node, WorkflowGraph};
pub use scheduler::Scheduler;
