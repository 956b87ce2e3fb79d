//! Signal codec
//!
//! Analysis units are independent components with no enforced shared schema
//! version, so their payloads arrive in two shapes: structured JSON, or the
//! textual rendering of a literal data expression. The codec tries the
//! strict parse first and falls back to the lenient one; if both fail the
//! decode error names the offending producer and is fatal to the consumer.

use crate::error::{PipelineError, Result};
use crate::state::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional reading reported by an analysis unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Some(Direction::Bullish),
            "bearish" => Some(Direction::Bearish),
            "neutral" => Some(Direction::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => f.write_str("bullish"),
            Direction::Bearish => f.write_str("bearish"),
            Direction::Neutral => f.write_str("neutral"),
        }
    }
}

/// A normalized `{direction, confidence}` pair decoded from a stage output
///
/// `reported` preserves the unit's raw confidence text ("72%" or "0.72")
/// so thesis points can quote the value exactly as the unit reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub direction: Direction,
    pub confidence: f64,
    pub reported: String,
}

impl Signal {
    /// Decode a message payload into a signal
    pub fn decode(message: &Message) -> Result<Signal> {
        let object = decode_payload(message)?;
        let producer = message.producer;

        let direction = object
            .get("signal")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| PipelineError::decode(producer, "missing 'signal' field"))
            .and_then(|s| {
                Direction::parse(s).ok_or_else(|| {
                    PipelineError::decode(producer, format!("unknown signal direction '{s}'"))
                })
            })?;

        let raw = object
            .get("confidence")
            .ok_or_else(|| PipelineError::decode(producer, "missing 'confidence' field"))?;
        let (confidence, reported) = normalize_confidence(message, raw)?;

        Ok(Signal {
            direction,
            confidence,
            reported,
        })
    }
}

/// Decode a message payload into a JSON object, strict-then-lenient
///
/// Strict path: the payload already is an object, or is a string holding
/// valid JSON. Lenient path: the same text re-parsed as a literal data
/// expression (single-quoted keys, `True`/`False`/`None`).
pub fn decode_payload(message: &Message) -> Result<serde_json::Value> {
    let value = match &message.payload {
        serde_json::Value::Object(_) => message.payload.clone(),
        serde_json::Value::String(text) => serde_json::from_str(text)
            .ok()
            .or_else(|| lenient_literal(text))
            .ok_or_else(|| {
                PipelineError::decode(
                    message.producer,
                    "payload is neither valid JSON nor a literal data expression",
                )
            })?,
        other => {
            return Err(PipelineError::decode(
                message.producer,
                format!("payload must be an object or string, got {other}"),
            ));
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(PipelineError::decode(
            message.producer,
            "decoded payload is not an object",
        ))
    }
}

/// Re-parse a textual payload as a literal data expression
///
/// Covers the common literal forms: single-quoted strings and the
/// capitalized boolean/null keywords.
fn lenient_literal(text: &str) -> Option<serde_json::Value> {
    let normalized = text
        .replace('\'', "\"")
        .replace("True", "true")
        .replace("False", "false")
        .replace("None", "null");
    serde_json::from_str(&normalized).ok()
}

/// Normalize a confidence value to a 0-1 fraction
///
/// Percentage strings ("72%") are stripped and divided by 100; fractions
/// pass through unchanged. Anything outside [0, 1] after normalization is
/// a decode failure, not a clamp.
fn normalize_confidence(message: &Message, raw: &serde_json::Value) -> Result<(f64, String)> {
    let producer = message.producer;
    let (fraction, reported) = match raw {
        serde_json::Value::Number(n) => {
            let value = n
                .as_f64()
                .ok_or_else(|| PipelineError::decode(producer, "confidence is not a number"))?;
            (value, n.to_string())
        }
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            let fraction = if let Some(percent) = trimmed.strip_suffix('%') {
                percent.trim().parse::<f64>().map_err(|e| {
                    PipelineError::decode(producer, format!("bad percentage '{s}': {e}"))
                })? / 100.0
            } else {
                trimmed.parse::<f64>().map_err(|e| {
                    PipelineError::decode(producer, format!("bad confidence '{s}': {e}"))
                })?
            };
            (fraction, s.clone())
        }
        other => {
            return Err(PipelineError::decode(
                producer,
                format!("confidence must be a number or string, got {other}"),
            ));
        }
    };

    if (0.0..=1.0).contains(&fraction) {
        Ok((fraction, reported))
    } else {
        Err(PipelineError::decode(
            producer,
            format!("confidence {fraction} out of range [0, 1]"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{AnalystId, StageId};

    fn message(payload: serde_json::Value) -> Message {
        Message::new(StageId::Analyst(AnalystId::Technical), payload)
    }

    #[test]
    fn test_decode_structured_object() {
        let signal = Signal::decode(&message(
            serde_json::json!({"signal": "bullish", "confidence": 0.8}),
        ))
        .unwrap();
        assert_eq!(signal.direction, Direction::Bullish);
        assert!((signal.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(signal.reported, "0.8");
    }

    #[test]
    fn test_percentage_and_fraction_agree() {
        let percent = Signal::decode(&message(
            serde_json::json!({"signal": "bearish", "confidence": "65%"}),
        ))
        .unwrap();
        let fraction = Signal::decode(&message(
            serde_json::json!({"signal": "bearish", "confidence": 0.65}),
        ))
        .unwrap();
        assert!((percent.confidence - fraction.confidence).abs() < 1e-12);
        assert_eq!(percent.reported, "65%");
    }

    #[test]
    fn test_decode_json_string_payload() {
        let signal = Signal::decode(&message(serde_json::json!(
            r#"{"signal": "neutral", "confidence": "0.5"}"#
        )))
        .unwrap();
        assert_eq!(signal.direction, Direction::Neutral);
        assert!((signal.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lenient_literal_fallback() {
        let signal = Signal::decode(&message(serde_json::json!(
            "{'signal': 'bullish', 'confidence': '72%'}"
        )))
        .unwrap();
        assert_eq!(signal.direction, Direction::Bullish);
        assert!((signal.confidence - 0.72).abs() < 1e-12);
    }

    #[test]
    fn test_unparseable_payload_names_producer() {
        let err = Signal::decode(&message(serde_json::json!("not a payload"))).unwrap_err();
        match err {
            PipelineError::Decode { producer, .. } => {
                assert_eq!(producer, "technical_analyst");
            }
            other => panic!("expected decode error, got {other}"),
        }
    }

    #[test]
    fn test_confidence_out_of_range() {
        let err = Signal::decode(&message(
            serde_json::json!({"signal": "bullish", "confidence": 1.5}),
        ))
        .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_missing_fields() {
        let err = Signal::decode(&message(serde_json::json!({"confidence": 0.4}))).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));

        let err = Signal::decode(&message(serde_json::json!({"signal": "bullish"}))).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }
}
