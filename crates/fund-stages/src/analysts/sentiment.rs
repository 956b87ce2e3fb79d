//! News sentiment analysis unit

use crate::analysts::round2;
use async_trait::async_trait;
use fund_core::{AnalystId, Direction, Message, PipelineState, Result, Stage, StageId, keys};
use serde_json::json;

/// Sentiment beyond this magnitude counts as a directional reading
const SENTIMENT_THRESHOLD: f64 = 0.2;

/// Maps an aggregate news sentiment score in [-1, 1] to a signal
pub struct SentimentAnalystStage;

impl SentimentAnalystStage {
    fn read(score: Option<f64>) -> (Direction, f64) {
        let Some(score) = score else {
            return (Direction::Neutral, 0.5);
        };
        let score = score.clamp(-1.0, 1.0);
        let direction = if score > SENTIMENT_THRESHOLD {
            Direction::Bullish
        } else if score < -SENTIMENT_THRESHOLD {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        let confidence = round2((0.5 + score.abs() * 0.4).min(0.9));
        (direction, confidence)
    }
}

#[async_trait]
impl Stage for SentimentAnalystStage {
    fn id(&self) -> StageId {
        StageId::Analyst(AnalystId::Sentiment)
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let score: Option<f64> = state.get_typed(keys::NEWS_SENTIMENT)?;
        let (direction, confidence) = Self::read(score);
        Ok(Message::new(
            self.id(),
            json!({"signal": direction, "confidence": confidence}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_sentiment_is_bullish() {
        let (direction, confidence) = SentimentAnalystStage::read(Some(0.75));
        assert_eq!(direction, Direction::Bullish);
        assert!((confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_negative_sentiment_is_bearish() {
        let (direction, _) = SentimentAnalystStage::read(Some(-0.6));
        assert_eq!(direction, Direction::Bearish);
    }

    #[test]
    fn test_weak_or_missing_sentiment_is_neutral() {
        let (direction, _) = SentimentAnalystStage::read(Some(0.1));
        assert_eq!(direction, Direction::Neutral);

        let (direction, confidence) = SentimentAnalystStage::read(None);
        assert_eq!(direction, Direction::Neutral);
        assert!((confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let (direction, confidence) = SentimentAnalystStage::read(Some(5.0));
        assert_eq!(direction, Direction::Bullish);
        assert!((confidence - 0.9).abs() < 1e-12);
    }
}
