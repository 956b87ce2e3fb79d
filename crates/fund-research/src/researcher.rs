//! Researcher stages wrapping the synthesizer for each perspective

use crate::sink::{ReasoningSink, TracingSink};
use crate::synthesizer::synthesize;
use async_trait::async_trait;
use fund_core::{Message, Perspective, PipelineState, Result, Stage, StageId};
use std::sync::Arc;
use tracing::debug;

/// A bull or bear researcher node
///
/// The two perspectives share this implementation; they differ only in the
/// phrasing tables the synthesizer selects. Neither holds any mutable
/// aggregation state, so execution order between them cannot matter.
pub struct ResearcherStage {
    perspective: Perspective,
    sink: Arc<dyn ReasoningSink>,
}

impl ResearcherStage {
    /// Create a researcher publishing reasoning through the default sink
    pub fn new(perspective: Perspective) -> Self {
        Self::with_sink(perspective, Arc::new(TracingSink))
    }

    /// Create a researcher with an explicit reasoning sink
    pub fn with_sink(perspective: Perspective, sink: Arc<dyn ReasoningSink>) -> Self {
        Self { perspective, sink }
    }
}

#[async_trait]
impl Stage for ResearcherStage {
    fn id(&self) -> StageId {
        self.perspective.researcher()
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let thesis = synthesize(state, self.perspective)?;
        debug!(
            stage = %self.id(),
            confidence = thesis.confidence,
            points = thesis.points.len(),
            "thesis synthesized"
        );
        if state.config().show_reasoning {
            self.sink.publish(self.id(), &thesis);
        }
        thesis.encode(self.id())
    }
}
