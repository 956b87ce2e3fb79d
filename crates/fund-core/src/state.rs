//! Shared pipeline state: the append-only message log and keyed context
//!
//! `PipelineState` is owned by the scheduler for the duration of one run.
//! Stages receive it by reference and return their single message; the
//! scheduler performs the append, so mutation of the log is serialized
//! through a single writer even while many nodes compute concurrently.

use crate::config::RunConfig;
use crate::error::{PipelineError, Result};
use crate::stage::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys for run inputs
pub mod keys {
    /// Instrument identifier under analysis
    pub const TICKER: &str = "ticker";
    /// Analysis window start (YYYY-MM-DD)
    pub const START_DATE: &str = "start_date";
    /// Analysis window end (YYYY-MM-DD)
    pub const END_DATE: &str = "end_date";
    /// Portfolio snapshot (cash, shares)
    pub const PORTFOLIO: &str = "portfolio";
    /// Unique identifier for this run
    pub const RUN_ID: &str = "run_id";
    /// Optional fundamental ratios consumed by the fundamentals analyst
    pub const FUNDAMENTALS: &str = "fundamentals";
    /// Optional news sentiment score in [-1, 1]
    pub const NEWS_SENTIMENT: &str = "news_sentiment";
}

/// One entry in the append-only message log
#[derive(Debug, Clone)]
pub struct Message {
    /// Identity of the stage that created this message
    pub producer: StageId,
    /// Opaque structured content
    pub payload: serde_json::Value,
}

impl Message {
    /// Create a message with a raw JSON payload
    pub fn new(producer: StageId, payload: serde_json::Value) -> Self {
        Self { producer, payload }
    }

    /// Create a message by serializing a typed payload
    pub fn encode<T: Serialize>(producer: StageId, payload: &T) -> Result<Self> {
        let payload = serde_json::to_value(payload).map_err(|e| {
            PipelineError::node(producer, format!("failed to encode payload: {e}"))
        })?;
        Ok(Self { producer, payload })
    }
}

/// The state threaded through every stage of one pipeline run
///
/// The message log is append-only and insertion order is preserved, but
/// consumers look messages up by producer identity rather than position so
/// that concurrent append order never affects their output.
#[derive(Debug, Clone)]
pub struct PipelineState {
    messages: Vec<Message>,
    context: HashMap<String, serde_json::Value>,
    config: RunConfig,
}

impl PipelineState {
    /// Create an empty state for one run
    pub fn new(config: RunConfig) -> Self {
        Self {
            messages: Vec::new(),
            context: HashMap::new(),
            config,
        }
    }

    /// Create a state seeded with the run-start instruction message
    pub fn with_seed(config: RunConfig, instruction: impl Into<String>) -> Self {
        let mut state = Self::new(config);
        state.messages.push(Message::new(
            StageId::Seed,
            serde_json::json!({ "instruction": instruction.into() }),
        ));
        state
    }

    /// Append a stage's message to the log
    ///
    /// Each stage identity may appear at most once per run; a duplicate
    /// producer is a contract violation by the caller.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if self.message_from(message.producer).is_some() {
            return Err(PipelineError::Configuration(format!(
                "stage {} already appended a message this run",
                message.producer
            )));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Look up a message by producer identity
    pub fn message_from(&self, producer: StageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.producer == producer)
    }

    /// The full message log, in append order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The run-scoped configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    // =========== Keyed context ===========

    /// Insert a raw value into the context
    pub fn insert_context(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.context.insert(key.into(), value);
    }

    /// Get a raw value from the context
    pub fn context(&self, key: &str) -> Option<&serde_json::Value> {
        self.context.get(key)
    }

    /// Insert a typed value into the context
    pub fn insert_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| {
            PipelineError::Configuration(format!("failed to serialize context value: {e}"))
        })?;
        self.context.insert(key.into(), value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.context.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    PipelineError::Configuration(format!(
                        "failed to deserialize context value '{key}': {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Get a context value as a string slice
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::AnalystId;

    #[test]
    fn test_seed_message() {
        let state = PipelineState::with_seed(RunConfig::default(), "decide");
        assert_eq!(state.messages().len(), 1);
        let seed = state.message_from(StageId::Seed).unwrap();
        assert_eq!(seed.payload["instruction"], "decide");
    }

    #[test]
    fn test_append_and_lookup() {
        let mut state = PipelineState::new(RunConfig::default());
        let message = Message::new(
            StageId::Analyst(AnalystId::Technical),
            serde_json::json!({"signal": "bullish", "confidence": 0.8}),
        );
        state.append(message).unwrap();

        let found = state
            .message_from(StageId::Analyst(AnalystId::Technical))
            .unwrap();
        assert_eq!(found.payload["signal"], "bullish");
        assert!(state.message_from(StageId::DebateRoom).is_none());
    }

    #[test]
    fn test_duplicate_producer_rejected() {
        let mut state = PipelineState::new(RunConfig::default());
        let message = Message::new(StageId::MarketData, serde_json::json!({}));
        state.append(message.clone()).unwrap();

        let err = state.append(message).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_typed_context_roundtrip() {
        let mut state = PipelineState::new(RunConfig::default());
        let portfolio = crate::Portfolio::new(50_000.0, 10);
        state.insert_typed(keys::PORTFOLIO, &portfolio).unwrap();

        let back: crate::Portfolio = state.get_typed(keys::PORTFOLIO).unwrap().unwrap();
        assert_eq!(back, portfolio);
        let missing: Option<crate::Portfolio> = state.get_typed("absent").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_context_str() {
        let mut state = PipelineState::new(RunConfig::default());
        state.insert_context(keys::TICKER, serde_json::json!("AAPL"));
        assert_eq!(state.context_str(keys::TICKER), Some("AAPL"));
        assert_eq!(state.context_str(keys::RUN_ID), None);
    }
}
