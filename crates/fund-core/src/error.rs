//! Error types for the trading pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type for pipeline operations
///
/// Every error is fatal to the run it occurs in. A damped default score
/// during thesis synthesis is a disagreement outcome, not an error, so it
/// never appears here.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid run configuration (empty or duplicate analyst selection,
    /// missing stage registration, zero matched signals during synthesis)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A stage payload matched neither the strict nor the lenient parse
    #[error("failed to decode payload from {producer}: {reason}")]
    Decode { producer: String, reason: String },

    /// A stage failed internally or exceeded its execution bound
    #[error("stage {node} failed: {reason}")]
    NodeExecution { node: String, reason: String },
}

impl PipelineError {
    /// Build a decode error tagged with the offending producer
    pub fn decode(producer: impl ToString, reason: impl Into<String>) -> Self {
        Self::Decode {
            producer: producer.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a node execution error tagged with the failing node
    pub fn node(node: impl ToString, reason: impl Into<String>) -> Self {
        Self::NodeExecution {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::Configuration("empty selection".to_string());
        assert_eq!(err.to_string(), "configuration error: empty selection");

        let err = PipelineError::decode("sentiment_analyst", "not valid JSON");
        assert_eq!(
            err.to_string(),
            "failed to decode payload from sentiment_analyst: not valid JSON"
        );

        let err = PipelineError::node("debate_room", "missing thesis");
        assert_eq!(err.to_string(), "stage debate_room failed: missing thesis");
    }
}
