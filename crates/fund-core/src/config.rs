//! Run-scoped configuration

use crate::stage::AnalystId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one pipeline run
///
/// The analyst selection is ordered and validated by the graph builder
/// before any node executes; `RunConfig` just carries it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Expose each synthesizer's full thesis to the reasoning sink
    pub show_reasoning: bool,

    /// Ordered selection of analysis units for this run
    pub analysts: Vec<AnalystId>,

    /// Execution bound for any single node; elapse counts as node failure
    pub node_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            show_reasoning: false,
            analysts: AnalystId::ALL.to_vec(),
            node_timeout: Duration::from_secs(60),
        }
    }
}

impl RunConfig {
    /// Create a config with the given analyst selection
    pub fn with_analysts(analysts: Vec<AnalystId>) -> Self {
        Self {
            analysts,
            ..Self::default()
        }
    }
}

/// Portfolio snapshot carried in the pipeline context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Cash available for new positions
    pub cash: f64,
    /// Shares currently held
    pub shares: u64,
}

impl Portfolio {
    pub fn new(cash: f64, shares: u64) -> Self {
        Self { cash, shares }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(!config.show_reasoning);
        assert_eq!(config.analysts, AnalystId::ALL.to_vec());
        assert_eq!(config.node_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_with_analysts() {
        let config = RunConfig::with_analysts(vec![AnalystId::Technical]);
        assert_eq!(config.analysts, vec![AnalystId::Technical]);
    }

    #[test]
    fn test_portfolio_roundtrip() {
        let portfolio = Portfolio::new(100_000.0, 50);
        let value = serde_json::to_value(&portfolio).unwrap();
        let back: Portfolio = serde_json::from_value(value).unwrap();
        assert_eq!(back, portfolio);
    }
}
