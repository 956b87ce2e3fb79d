//! Portfolio manager: the terminal decision stage

use crate::market_data::MarketSnapshot;
use crate::risk::RiskAssessment;
use async_trait::async_trait;
use fund_core::{
    Direction, Message, PipelineError, PipelineState, Portfolio, Result, Stage, StageId, keys,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The action the run recommends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

/// The terminal payload: the run's externally observable result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub action: TradeAction,
    pub quantity: u64,
    pub confidence: f64,
    pub reasoning: String,
}

/// Turns the risk gate's ceiling into a sized order
pub struct PortfolioManagerStage;

impl PortfolioManagerStage {
    fn decide(
        assessment: &RiskAssessment,
        portfolio: &Portfolio,
        last_close: Option<f64>,
    ) -> TradeDecision {
        let (action, quantity, reasoning) = match assessment.signal {
            Direction::Bullish => match last_close {
                Some(price) if price > 0.0 => {
                    let quantity = (assessment.max_position_value / price).floor() as u64;
                    if quantity > 0 {
                        (
                            TradeAction::Buy,
                            quantity,
                            format!("Buying {quantity} shares within the risk ceiling"),
                        )
                    } else {
                        (
                            TradeAction::Hold,
                            0,
                            "Risk ceiling too small for a single share".to_string(),
                        )
                    }
                }
                _ => (
                    TradeAction::Hold,
                    0,
                    "No price available to size a position".to_string(),
                ),
            },
            Direction::Bearish => {
                if portfolio.shares > 0 {
                    (
                        TradeAction::Sell,
                        portfolio.shares,
                        format!("Closing out {} held shares", portfolio.shares),
                    )
                } else {
                    (
                        TradeAction::Hold,
                        0,
                        "Bearish reading with no position to reduce".to_string(),
                    )
                }
            }
            Direction::Neutral => (
                TradeAction::Hold,
                0,
                "No directional edge after reconciliation".to_string(),
            ),
        };

        TradeDecision {
            action,
            quantity,
            confidence: assessment.confidence,
            reasoning,
        }
    }
}

#[async_trait]
impl Stage for PortfolioManagerStage {
    fn id(&self) -> StageId {
        StageId::PortfolioManager
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let risk = state
            .message_from(StageId::RiskManager)
            .ok_or_else(|| PipelineError::node(self.id(), "missing risk manager message"))?;
        let assessment: RiskAssessment = serde_json::from_value(risk.payload.clone())
            .map_err(|e| {
                PipelineError::decode(StageId::RiskManager, format!("bad risk assessment: {e}"))
            })?;
        let portfolio: Portfolio = state.get_typed(keys::PORTFOLIO)?.ok_or_else(|| {
            PipelineError::Configuration("portfolio snapshot missing from context".to_string())
        })?;
        let last_close = MarketSnapshot::from_state(state)?.last_close();

        let decision = Self::decide(&assessment, &portfolio, last_close);
        info!(
            action = ?decision.action,
            quantity = decision.quantity,
            confidence = decision.confidence,
            "trade decision made"
        );
        Message::encode(self.id(), &decision)
    }
}
