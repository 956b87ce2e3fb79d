//! Market data entry stage
//!
//! Data retrieval itself lives outside the pipeline; the entry node only
//! consumes a `MarketDataSource` and appends the snapshot every downstream
//! stage reads. Analysts look the snapshot up by producer identity, never
//! by log position.

use async_trait::async_trait;
use fund_core::{Message, PipelineError, PipelineState, Result, Stage, StageId, keys};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// The dataset the entry node publishes for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    /// Daily closing prices over the window, oldest first; may be empty
    /// when no price history was supplied
    pub closes: Vec<f64>,
}

impl MarketSnapshot {
    /// Read the snapshot back out of the entry node's message
    pub fn from_state(state: &PipelineState) -> Result<Self> {
        let message = state.message_from(StageId::MarketData).ok_or_else(|| {
            PipelineError::Configuration("market data stage has not run".to_string())
        })?;
        serde_json::from_value(message.payload.clone()).map_err(|e| {
            PipelineError::decode(StageId::MarketData, format!("bad market snapshot: {e}"))
        })
    }

    /// Most recent closing price, if any history was supplied
    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

/// Source of market data for the entry node
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the snapshot for one instrument over one window
    async fn fetch(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<MarketSnapshot>;
}

/// A source that serves caller-provided closing prices
///
/// With no prices the snapshot is empty and the reference analysts report
/// neutral readings.
#[derive(Debug, Clone, Default)]
pub struct InlineMarketData {
    closes: Vec<f64>,
}

impl InlineMarketData {
    pub fn new(closes: Vec<f64>) -> Self {
        Self { closes }
    }
}

#[async_trait]
impl MarketDataSource for InlineMarketData {
    async fn fetch(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<MarketSnapshot> {
        Ok(MarketSnapshot {
            ticker: ticker.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            closes: self.closes.clone(),
        })
    }
}

/// The fixed entry node of every workflow graph
pub struct MarketDataStage {
    source: Arc<dyn MarketDataSource>,
}

impl MarketDataStage {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Stage for MarketDataStage {
    fn id(&self) -> StageId {
        StageId::MarketData
    }

    async fn run(&self, state: &PipelineState) -> Result<Message> {
        let ticker = state
            .context_str(keys::TICKER)
            .ok_or_else(|| PipelineError::node(self.id(), "missing ticker in context"))?;
        let start_date = state.context_str(keys::START_DATE).unwrap_or_default();
        let end_date = state.context_str(keys::END_DATE).unwrap_or_default();

        let snapshot = self.source.fetch(ticker, start_date, end_date).await?;
        info!(
            ticker = %snapshot.ticker,
            closes = snapshot.closes.len(),
            "market snapshot acquired"
        );
        Message::encode(self.id(), &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fund_core::RunConfig;
    use serde_json::json;

    fn seeded_state() -> PipelineState {
        let mut state = PipelineState::new(RunConfig::default());
        state.insert_context(keys::TICKER, json!("AAPL"));
        state.insert_context(keys::START_DATE, json!("2025-08-07"));
        state.insert_context(keys::END_DATE, json!("2026-08-06"));
        state
    }

    #[tokio::test]
    async fn test_entry_stage_appends_snapshot() {
        let stage = MarketDataStage::new(Arc::new(InlineMarketData::new(vec![10.0, 11.0])));
        let mut state = seeded_state();

        let message = stage.run(&state).await.unwrap();
        assert_eq!(message.producer, StageId::MarketData);
        state.append(message).unwrap();

        let snapshot = MarketSnapshot::from_state(&state).unwrap();
        assert_eq!(snapshot.ticker, "AAPL");
        assert_eq!(snapshot.closes, vec![10.0, 11.0]);
        assert_eq!(snapshot.last_close(), Some(11.0));
    }

    #[tokio::test]
    async fn test_missing_ticker_fails() {
        let stage = MarketDataStage::new(Arc::new(InlineMarketData::default()));
        let state = PipelineState::new(RunConfig::default());

        let err = stage.run(&state).await.unwrap_err();
        assert!(matches!(err, PipelineError::NodeExecution { .. }));
    }

    #[test]
    fn test_snapshot_missing_before_entry_runs() {
        let state = PipelineState::new(RunConfig::default());
        let err = MarketSnapshot::from_state(&state).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}
