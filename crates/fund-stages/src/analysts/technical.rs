//! Technical analysis unit

use crate::analysts::round2;
use crate::market_data::MarketSnapshot;
use async_trait::async_trait;
use fund_core::{AnalystId, Direction, Message, PipelineState, Result, Stage, StageId};
use serde_json::json;

/// Momentum thresholds: a move beyond 2% over the window counts as a trend
const TREND_THRESHOLD: f64 = 0.02;

/// Reads price momentum over the analysis window
pub struct TechnicalAnalystStage;

impl TechnicalAnalystStage {
    fn read(closes: &[f64]) -> (Direction, f64) {
        let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
            return (Direction::Neutral, 0.5);
        };
        if closes.len() < 2 || *first <= 0.0 {
            return (Direction::Neutral, 0.5);
        }

        let change = last / first - 1.0;
        let direction = if change > TREND_THRESHOLD {
            Direction::Bullish
        } else if change < -TREND_THRESHOLD {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        let confidence = round2((0.5 + change.abs() * 2.0).min(0.9));
        (direction, confidence)
    }
}

#[async_trait]
impl Stage for TechnicalAnalystStage {
    fn id(&self) -> StageId {
        StageId::Analyst(AnalystId::Technical)
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let snapshot = MarketSnapshot::from_state(state)?;
        let (direction, confidence) = Self::read(&snapshot.closes);
        Ok(Message::new(
            self.id(),
            json!({"signal": direction, "confidence": confidence}),
        ))
    }
}
