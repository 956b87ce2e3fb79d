//! Risk manager: gates exposure from the reconciled reading

use async_trait::async_trait;
use fund_core::{
    Direction, Message, PipelineError, PipelineState, Portfolio, Result, Signal, Stage, StageId,
    keys,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on the fraction of cash committed to any single position
const BASE_EXPOSURE: f64 = 0.25;

/// The risk gate's assessment, consumed by the portfolio manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub signal: Direction,
    pub confidence: f64,
    /// Largest position value, in cash terms, the gate will allow
    pub max_position_value: f64,
    /// Residual risk in [0, 1]; a contested debate leaves more of it
    pub risk_score: f64,
    pub reasoning: String,
}

/// Sizes the exposure ceiling from the debate outcome and the portfolio
pub struct RiskManagerStage;

#[async_trait]
impl Stage for RiskManagerStage {
    fn id(&self) -> StageId {
        StageId::RiskManager
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let debate = state
            .message_from(StageId::DebateRoom)
            .ok_or_else(|| PipelineError::node(self.id(), "missing debate room message"))?;
        let net = Signal::decode(debate)?;
        let portfolio: Portfolio = state.get_typed(keys::PORTFOLIO)?.ok_or_else(|| {
            PipelineError::Configuration("portfolio snapshot missing from context".to_string())
        })?;

        // A decisive debate widens the ceiling; a contested one halves it.
        let exposure = BASE_EXPOSURE * (0.5 + net.confidence * 0.5);
        let max_position_value = (portfolio.cash * exposure * 100.0).round() / 100.0;
        let risk_score = 1.0 - net.confidence;
        debug!(%net.direction, exposure, max_position_value, "risk gate evaluated");

        Message::encode(
            self.id(),
            &RiskAssessment {
                signal: net.direction,
                confidence: net.confidence,
                max_position_value,
                risk_score,
                reasoning: format!(
                    "Net {} reading at {:.2} confidence allows up to {:.1}% of cash",
                    net.direction,
                    net.confidence,
                    exposure * 100.0
                ),
            },
        )
    }
}
