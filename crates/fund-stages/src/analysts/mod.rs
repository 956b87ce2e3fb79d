//! Reference analysis units
//!
//! Small deterministic implementations of the four analyst categories.
//! Each reads the market snapshot (or its own context key), forms a
//! directional reading, and emits the `{signal, confidence}` payload the
//! signal codec expects. Heavier implementations (indicator libraries,
//! LLM-backed units) plug in by implementing the same `Stage` contract.

pub mod fundamentals;
pub mod sentiment;
pub mod technical;
pub mod valuation;

pub use fundamentals::{FundamentalRatios, FundamentalsAnalystStage};
pub use sentiment::SentimentAnalystStage;
pub use technical::TechnicalAnalystStage;
pub use valuation::ValuationAnalystStage;

/// Round a confidence to two decimals so reported values stay readable
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
