//! Stage identities and the core Stage trait

use crate::{Result, state::Message, state::PipelineState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four recognized analysis categories
///
/// The synthesizers are unaware of unit-specific semantics beyond these
/// categories; each has its own thesis phrasing but identical aggregation
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalystId {
    Technical,
    Fundamentals,
    Sentiment,
    Valuation,
}

impl AnalystId {
    /// All categories, in the canonical presentation order
    pub const ALL: [AnalystId; 4] = [
        AnalystId::Technical,
        AnalystId::Fundamentals,
        AnalystId::Sentiment,
        AnalystId::Valuation,
    ];

    /// Short name used for CLI selection and serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalystId::Technical => "technical",
            AnalystId::Fundamentals => "fundamentals",
            AnalystId::Sentiment => "sentiment",
            AnalystId::Valuation => "valuation",
        }
    }
}

impl fmt::Display for AnalystId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalystId {
    type Err = crate::PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(AnalystId::Technical),
            "fundamentals" => Ok(AnalystId::Fundamentals),
            "sentiment" => Ok(AnalystId::Sentiment),
            "valuation" => Ok(AnalystId::Valuation),
            other => Err(crate::PipelineError::Configuration(format!(
                "unknown analyst '{other}' (expected one of: technical, fundamentals, sentiment, valuation)"
            ))),
        }
    }
}

/// Identity of a pipeline stage, unique per run
///
/// `Seed` marks the run-start message and is never scheduled as a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    Seed,
    MarketData,
    Analyst(AnalystId),
    BullResearcher,
    BearResearcher,
    DebateRoom,
    RiskManager,
    PortfolioManager,
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageId::Seed => f.write_str("seed"),
            StageId::MarketData => f.write_str("market_data"),
            StageId::Analyst(id) => write!(f, "{id}_analyst"),
            StageId::BullResearcher => f.write_str("bull_researcher"),
            StageId::BearResearcher => f.write_str("bear_researcher"),
            StageId::DebateRoom => f.write_str("debate_room"),
            StageId::RiskManager => f.write_str("risk_manager"),
            StageId::PortfolioManager => f.write_str("portfolio_manager"),
        }
    }
}

/// Core trait every pipeline stage implements
///
/// A stage receives the pipeline state by reference, may read all of it,
/// and returns exactly one message carrying its own identity. The scheduler
/// performs the append, so concurrent siblings never mutate shared state.
#[async_trait]
pub trait Stage: Send + Sync {
    /// The node identity this stage executes as
    fn id(&self) -> StageId;

    /// Run the stage against a snapshot of the pipeline state
    async fn run(&self, state: &PipelineState) -> Result<Message>;
}
