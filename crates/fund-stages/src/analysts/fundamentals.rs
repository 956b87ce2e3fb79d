//! Fundamental analysis unit

use crate::analysts::round2;
use async_trait::async_trait;
use fund_core::{AnalystId, Direction, Message, PipelineState, Result, Stage, StageId, keys};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Fundamental ratios supplied through the pipeline context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRatios {
    pub pe_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

/// Scores company health from the ratios in context
///
/// With no ratios supplied the unit reports a neutral reading rather than
/// failing; a missing data feed is expected, not an error.
pub struct FundamentalsAnalystStage;

impl FundamentalsAnalystStage {
    fn read(ratios: &FundamentalRatios) -> (Direction, f64) {
        let mut score = 0i32;
        let mut observed = 0i32;

        if let Some(pe) = ratios.pe_ratio {
            observed += 1;
            if pe > 0.0 && pe < 15.0 {
                score += 1;
            } else if pe <= 0.0 || pe > 30.0 {
                score -= 1;
            }
        }
        if let Some(growth) = ratios.revenue_growth {
            observed += 1;
            if growth > 0.10 {
                score += 1;
            } else if growth < 0.0 {
                score -= 1;
            }
        }
        if let Some(leverage) = ratios.debt_to_equity {
            observed += 1;
            if leverage < 0.5 {
                score += 1;
            } else if leverage > 2.0 {
                score -= 1;
            }
        }

        if observed == 0 {
            return (Direction::Neutral, 0.5);
        }
        let direction = match score.signum() {
            1 => Direction::Bullish,
            -1 => Direction::Bearish,
            _ => Direction::Neutral,
        };
        let confidence = round2((0.5 + 0.15 * f64::from(score.abs())).min(0.9));
        (direction, confidence)
    }
}

#[async_trait]
impl Stage for FundamentalsAnalystStage {
    fn id(&self) -> StageId {
        StageId::Analyst(AnalystId::Fundamentals)
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let ratios: FundamentalRatios = state
            .get_typed(keys::FUNDAMENTALS)?
            .unwrap_or_default();
        let (direction, confidence) = Self::read(&ratios);
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
    fn test_healthy_ratios_are_bullish() {
        let ratios = FundamentalRatios {
            pe_ratio: Some(12.0),
            revenue_growth: Some(0.2),
            debt_to_equity: Some(0.3),
        };
        let (direction, confidence) = FundamentalsAnalystStage::read(&ratios);
        assert_eq!(direction, Direction::Bullish);
        assert!((confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_stretched_ratios_are_bearish() {
        let ratios = FundamentalRatios {
            pe_ratio: Some(45.0),
            revenue_growth: Some(-0.05),
            debt_to_equity: Some(3.0),
        };
        let (direction, _) = FundamentalsAnalystStage::read(&ratios);
        assert_eq!(direction, Direction::Bearish);
    }

    #[test]
    fn test_no_data_is_neutral() {
        let (direction, confidence) = FundamentalsAnalystStage::read(&FundamentalRatios::default());
        assert_eq!(direction, Direction::Neutral);
        assert!((confidence - 0.5).abs() < 1e-12);
    }
}
