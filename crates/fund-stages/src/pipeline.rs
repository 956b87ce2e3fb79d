//! End-to-end pipeline assembly
//!
//! Builds the workflow graph for one run's analyst selection, registers
//! every concrete stage, drives the scheduler to completion, and extracts
//! the terminal decision payload by producer identity.

use crate::analysts::{
    FundamentalsAnalystStage, SentimentAnalystStage, TechnicalAnalystStage, ValuationAnalystStage,
};
use crate::debate::DebateRoomStage;
use crate::market_data::{MarketDataSource, MarketDataStage};
use crate::portfolio::PortfolioManagerStage;
use crate::risk::RiskManagerStage;
use fund_core::{
    AnalystId, Perspective, PipelineError, PipelineState, Portfolio, Result, RunConfig, Stage,
    StageId, keys,
};
use fund_research::{ReasoningSink, ResearcherStage, TracingSink};
use fund_workflow::{Scheduler, WorkflowGraph};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// The instruction seeded into every run's message log
const SEED_INSTRUCTION: &str = "Make a trading decision based on the provided data.";

/// Inputs for one pipeline run
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub portfolio: Portfolio,
    pub show_reasoning: bool,
    /// Ordered, non-empty, duplicate-free analyst selection
    pub analysts: Vec<AnalystId>,
}

/// One-shot driver for the full decision pipeline
pub struct TradingPipeline {
    source: Arc<dyn MarketDataSource>,
    sink: Arc<dyn ReasoningSink>,
}

impl TradingPipeline {
    /// Create a pipeline over the given market data source
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the reasoning sink the researchers publish to
    pub fn with_sink(mut self, sink: Arc<dyn ReasoningSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run the pipeline once, returning the terminal decision payload
    pub async fn run(&self, inputs: RunInputs) -> Result<serde_json::Value> {
        let graph = WorkflowGraph::build(&inputs.analysts)?;

        let run_id = uuid::Uuid::new_v4().to_string();
        info!(run_id = %run_id, ticker = %inputs.ticker, "starting pipeline run");

        let config = RunConfig {
            show_reasoning: inputs.show_reasoning,
            analysts: inputs.analysts.clone(),
            ..RunConfig::default()
        };
        let mut state = PipelineState::with_seed(config, SEED_INSTRUCTION);
        state.insert_context(keys::TICKER, json!(inputs.ticker));
        state.insert_context(keys::START_DATE, json!(inputs.start_date));
        state.insert_context(keys::END_DATE, json!(inputs.end_date));
        state.insert_context(keys::RUN_ID, json!(run_id));
        state.insert_typed(keys::PORTFOLIO, &inputs.portfolio)?;

        let mut scheduler = Scheduler::new();
        scheduler.register(Arc::new(MarketDataStage::new(self.source.clone())));
        for analyst in &inputs.analysts {
            scheduler.register(analyst_stage(*analyst));
        }
        scheduler.register(Arc::new(ResearcherStage::with_sink(
            Perspective::Bullish,
            self.sink.clone(),
        )));
        scheduler.register(Arc::new(ResearcherStage::with_sink(
            Perspective::Bearish,
            self.sink.clone(),
        )));
        scheduler.register(Arc::new(DebateRoomStage));
        scheduler.register(Arc::new(RiskManagerStage));
        scheduler.register(Arc::new(PortfolioManagerStage));

        let final_state = scheduler.run(&graph, state).await?;
        let decision = final_state
            .message_from(StageId::PortfolioManager)
            .ok_or_else(|| {
                PipelineError::Configuration("terminal stage produced no message".to_string())
            })?;
        info!(run_id = %run_id, "pipeline run finished");
        Ok(decision.payload.clone())
    }
}

fn analyst_stage(analyst: AnalystId) -> Arc<dyn Stage> {
    match analyst {
        AnalystId::Technical => Arc::new(TechnicalAnalystStage),
        AnalystId::Fundamentals => Arc::new(FundamentalsAnalystStage),
        AnalystId::Sentiment => Arc::new(SentimentAnalystStage),
        AnalystId::Valuation => Arc::new(ValuationAnalystStage),
    }
}
