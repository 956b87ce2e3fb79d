//! Valuation analysis unit

use crate::analysts::round2;
use crate::market_data::MarketSnapshot;
use async_trait::async_trait;
use fund_core::{AnalystId, Direction, Message, PipelineState, Result, Stage, StageId};
use serde_json::json;

/// Deviation from the trailing average beyond this fraction is a mispricing
const DEVIATION_THRESHOLD: f64 = 0.05;

/// Compares the latest close against the trailing average of the window
///
/// Trading well below the average reads as undervalued (bullish), well
/// above as overvalued (bearish).
pub struct ValuationAnalystStage;

impl ValuationAnalystStage {
    fn read(closes: &[f64]) -> (Direction, f64) {
        let Some(last) = closes.last() else {
            return (Direction::Neutral, 0.5);
        };
        if closes.len() < 2 {
            return (Direction::Neutral, 0.5);
        }
        let mean = closes.iter().sum::<f64>() / closes.len() as f64;
        if mean <= 0.0 {
            return (Direction::Neutral, 0.5);
        }

        let deviation = last / mean - 1.0;
        let direction = if deviation < -DEVIATION_THRESHOLD {
            Direction::Bullish
        } else if deviation > DEVIATION_THRESHOLD {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        let confidence = round2((0.5 + deviation.abs()).min(0.9));
        (direction, confidence)
    }
}

#[async_trait]
impl Stage for ValuationAnalystStage {
    fn id(&self) -> StageId {
        StageId::Analyst(AnalystId::Valuation)
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
