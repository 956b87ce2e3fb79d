//! Pipeline stages for the trading system
//!
//! This crate provides every concrete node the workflow graph schedules:
//!
//! - `MarketDataStage`: the fixed entry node, appending the market snapshot
//! - the four reference analyst units (technical, fundamentals, sentiment,
//!   valuation), each emitting a `{signal, confidence}` payload
//! - `DebateRoomStage`: reconciles the bull and bear theses
//! - `RiskManagerStage`: gates exposure from the reconciled reading
//! - `PortfolioManagerStage`: emits the terminal trade decision
//!
//! plus `TradingPipeline`, the end-to-end assembly that builds the graph
//! for a run's analyst selection and drives the scheduler to completion.

pub mod analysts;
pub mod debate;
pub mod market_data;
pub mod pipeline;
pub mod portfolio;
pub mod risk;

pub use analysts::{
    FundamentalRatios, FundamentalsAnalystStage, SentimentAnalystStage, TechnicalAnalystStage,
    ValuationAnalystStage,
};
pub use debate::DebateRoomStage;
pub use market_data::{InlineMarketData, MarketDataSource, MarketDataStage, MarketSnapshot};
pub use pipeline::{RunInputs, TradingPipeline};
pub use portfolio::{PortfolioManagerStage, TradeAction, TradeDecision};
pub use risk::{RiskAssessment, RiskManagerStage};
