//! Reasoning sink: the optional observability side channel
//!
//! When a run is configured with reasoning visibility, each researcher
//! publishes its full thesis here in addition to appending it to the log.
//! The sink is a side channel only; nothing in the pipeline depends on it.

use fund_core::{StageId, Thesis};
use tracing::info;

/// Receives each synthesizer's full thesis when reasoning visibility is on
pub trait ReasoningSink: Send + Sync {
    /// Publish one stage's reasoning
    fn publish(&self, stage: StageId, thesis: &Thesis);
}

/// Default sink that logs reasoning through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReasoningSink for TracingSink {
    fn publish(&self, stage: StageId, thesis: &Thesis) {
        let points = thesis.points.join("; ");
        info!(
            stage = %stage,
            confidence = thesis.confidence,
            points = %points,
            "researcher reasoning"
        );
    }
}
