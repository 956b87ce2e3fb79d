//! Debate room: reconciles the two theses into one net reading

use async_trait::async_trait;
use fund_core::{
    Direction, Message, Perspective, PipelineError, PipelineState, Result, Stage, StageId, Thesis,
};
use serde_json::json;
use tracing::debug;

/// Weighs the bull case against the bear case
///
/// The net reading is the signed difference of the two aggregate
/// confidences; an exact tie is a neutral outcome. The payload keeps the
/// `{signal, confidence}` shape so the risk gate decodes it with the same
/// codec as any analyst output.
pub struct DebateRoomStage;

impl DebateRoomStage {
    fn thesis(&self, state: &PipelineState, perspective: Perspective) -> Result<Thesis> {
        let message = state.message_from(perspective.researcher()).ok_or_else(|| {
            PipelineError::node(
                self.id(),
                format!("missing thesis from {}", perspective.researcher()),
            )
        })?;
        Thesis::decode(message)
    }
}

#[async_trait]
impl Stage for DebateRoomStage {
    fn id(&self) -> StageId {
        StageId::DebateRoom
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let bull = self.thesis(state, Perspective::Bullish)?;
        let bear = self.thesis(state, Perspective::Bearish)?;

        let spread = bull.confidence - bear.confidence;
        let direction = if spread > 0.0 {
            Direction::Bullish
        } else if spread < 0.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        let confidence = spread.abs().min(1.0);
        debug!(spread, %direction, "debate resolved");

        Ok(Message::new(
            self.id(),
            json!({
                "signal": direction,
                "confidence": confidence,
                "bull_confidence": bull.confidence,
                "bear_confidence": bear.confidence,
                "reasoning": format!(
                    "Bull case at {:.2} against bear case at {:.2}",
                    bull.confidence, bear.confidence
                ),
            }),
        ))
    }
}
