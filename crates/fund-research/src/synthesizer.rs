//! Signal aggregation shared by both researchers
//!
//! Agreement contributes the unit's own confidence; disagreement
//! contributes a fixed damping score representing residual uncertainty
//! rather than zero weight. The aggregate is the arithmetic mean over
//! exactly the selected units that produced a message.

use fund_core::{AnalystId, Perspective, PipelineError, PipelineState, Result, Signal, StageId, Thesis};
use tracing::debug;

/// Score contributed by a unit whose reading disagrees with the thesis
///
/// A deliberate damping constant: a contrary reading still counts, it just
/// counts as residual uncertainty. Never used to paper over an error.
pub const DISAGREEMENT_SCORE: f64 = 0.30;

/// Build one thesis from the analyst signals present in the state
///
/// Iterates the run's analyst selection in order. A selected unit with no
/// message is skipped silently (absence is expected, not an error); a
/// present message that fails to decode is fatal. Zero contributing units
/// leaves the mean undefined and fails the run.
pub fn synthesize(state: &PipelineState, perspective: Perspective) -> Result<Thesis> {
    let mut points = Vec::new();
    let mut scores = Vec::new();

    for analyst in &state.config().analysts {
        let Some(message) = state.message_from(StageId::Analyst(*analyst)) else {
            debug!(analyst = %analyst, "no message from selected analyst, skipping");
            continue;
        };
        let signal = Signal::decode(message)?;
        if signal.direction == perspective.expected_direction() {
            points.push(matched_point(perspective, *analyst, &signal.reported));
            scores.push(signal.confidence);
        } else {
            points.push(caveat_point(perspective, *analyst).to_string());
            scores.push(DISAGREEMENT_SCORE);
        }
    }

    if scores.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "no analysis signals available for {} synthesis",
            perspective.researcher()
        )));
    }

    let confidence = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(Thesis {
        perspective,
        confidence,
        points,
        rationale: rationale(perspective).to_string(),
    })
}

fn matched_point(perspective: Perspective, analyst: AnalystId, reported: &str) -> String {
    let lead = match (perspective, analyst) {
        (Perspective::Bullish, AnalystId::Technical) => {
            "Technical indicators show bullish momentum with"
        }
        (Perspective::Bullish, AnalystId::Fundamentals) => "Strong fundamentals with",
        (Perspective::Bullish, AnalystId::Sentiment) => "Positive market sentiment with",
        (Perspective::Bullish, AnalystId::Valuation) => "Stock appears undervalued with",
        (Perspective::Bearish, AnalystId::Technical) => {
            "Technical indicators show bearish momentum with"
        }
        (Perspective::Bearish, AnalystId::Fundamentals) => "Concerning fundamentals with",
        (Perspective::Bearish, AnalystId::Sentiment) => "Negative market sentiment with",
        (Perspective::Bearish, AnalystId::Valuation) => "Stock appears overvalued with",
    };
    format!("{lead} {reported} confidence")
}

fn caveat_point(perspective: Perspective, analyst: AnalystId) -> &'static str {
    match (perspective, analyst) {
        (Perspective::Bullish, AnalystId::Technical) => {
            "Technical indicators may be conservative, presenting buying opportunities"
        }
        (Perspective::Bullish, AnalystId::Fundamentals) => {
            "Company fundamentals show potential for improvement"
        }
        (Perspective::Bullish, AnalystId::Sentiment) => {
            "Market sentiment may be overly pessimistic, creating value opportunities"
        }
        (Perspective::Bullish, AnalystId::Valuation) => {
            "Current valuation may not fully reflect growth potential"
        }
        (Perspective::Bearish, AnalystId::Technical) => {
            "Technical rally may be temporary, suggesting potential reversal"
        }
        (Perspective::Bearish, AnalystId::Fundamentals) => {
            "Current fundamental strength may not be sustainable"
        }
        (Perspective::Bearish, AnalystId::Sentiment) => {
            "Market sentiment may be overly optimistic, indicating potential risks"
        }
        (Perspective::Bearish, AnalystId::Valuation) => {
            "Current valuation may not fully reflect downside risks"
        }
    }
}

fn rationale(perspective: Perspective) -> &'static str {
    match perspective {
        Perspective::Bullish => {
            "Bullish thesis based on comprehensive analysis of selected factors"
        }
        Perspective::Bearish => {
            "Bearish thesis based on comprehensive analysis of selected factors"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fund_core::{Message, RunConfig};
    use serde_json::json;

    fn state_with(analysts: &[AnalystId], signals: &[(AnalystId, serde_json::Value)]) -> PipelineState {
        let mut state = PipelineState::new(RunConfig::with_analysts(analysts.to_vec()));
        for (analyst, payload) in signals {
            state
                .append(Message::new(StageId::Analyst(*analyst), payload.clone()))
                .unwrap();
        }
        state
    }

    #[test]
    fn test_mean_over_mixed_signals() {
        let state = state_with(
            &[AnalystId::Technical, AnalystId::Sentiment],
            &[
                (
                    AnalystId::Technical,
                    json!({"signal": "bullish", "confidence": 0.9}),
                ),
                (
                    AnalystId::Sentiment,
                    json!({"signal": "bearish", "confidence": 0.6}),
                ),
            ],
        );

        let thesis = synthesize(&state, Perspective::Bullish).unwrap();
        assert_eq!(thesis.points.len(), 2);
        // agreement at 0.9, disagreement damped to 0.30
        assert!((thesis.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_analyst_is_skipped() {
        let state = state_with(
            &[AnalystId::Technical, AnalystId::Sentiment],
            &[(
                AnalystId::Technical,
                json!({"signal": "bullish", "confidence": 0.8}),
            )],
        );

        let thesis = synthesize(&state, Perspective::Bullish).unwrap();
        assert_eq!(thesis.points.len(), 1);
        assert!((thesis.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_matched_signals_is_fatal() {
        let state = state_with(&[AnalystId::Technical, AnalystId::Valuation], &[]);
        let err = synthesize(&state, Perspective::Bearish).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_unanimous_agreement_and_unanimous_damping() {
        let signals: Vec<_> = AnalystId::ALL
            .iter()
            .map(|a| (*a, json!({"signal": "bullish", "confidence": 0.8})))
            .collect();
        let state = state_with(&AnalystId::ALL, &signals);

        let bull = synthesize(&state, Perspective::Bullish).unwrap();
        assert_eq!(bull.points.len(), 4);
        assert!((bull.confidence - 0.8).abs() < 1e-12);

        let bear = synthesize(&state, Perspective::Bearish).unwrap();
        assert_eq!(bear.points.len(), 4);
        assert!((bear.confidence - DISAGREEMENT_SCORE).abs() < 1e-12);
        // All four points are caveats, none quote a confidence.
        assert!(bear.points.iter().all(|p| !p.contains("confidence")));
    }

    #[test]
    fn test_point_quotes_reported_confidence() {
        let state = state_with(
            &[AnalystId::Valuation],
            &[(
                AnalystId::Valuation,
                json!({"signal": "bearish", "confidence": "72%"}),
            )],
        );

        let thesis = synthesize(&state, Perspective::Bearish).unwrap();
        assert_eq!(
            thesis.points[0],
            "Stock appears overvalued with 72% confidence"
        );
        assert!((thesis.confidence - 0.72).abs() < 1e-12);
    }

    #[test]
    fn test_output_independent_of_append_order() {
        let technical = (
            AnalystId::Technical,
            json!({"signal": "bullish", "confidence": 0.9}),
        );
        let valuation = (
            AnalystId::Valuation,
            json!({"signal": "bullish", "confidence": 0.5}),
        );
        let selection = [AnalystId::Technical, AnalystId::Valuation];

        let forward = state_with(&selection, &[technical.clone(), valuation.clone()]);
        let reversed = state_with(&selection, &[valuation, technical]);

        let a = synthesize(&forward, Perspective::Bullish).unwrap();
        let b = synthesize(&reversed, Perspective::Bullish).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_failure_is_fatal() {
        let state = state_with(
            &[AnalystId::Technical],
            &[(AnalystId::Technical, json!("garbage"))],
        );
        let err = synthesize(&state, Perspective::Bullish).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }
}
