//! Thesis: the aggregated directional argument produced by a synthesizer

use crate::error::{PipelineError, Result};
use crate::signal::{Direction, decode_payload};
use crate::stage::StageId;
use crate::state::Message;
use serde::{Deserialize, Serialize};

/// The side a synthesizer argues for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Bullish,
    Bearish,
}

impl Perspective {
    /// The signal direction that counts as agreement with this perspective
    pub fn expected_direction(&self) -> Direction {
        match self {
            Perspective::Bullish => Direction::Bullish,
            Perspective::Bearish => Direction::Bearish,
        }
    }

    /// The researcher node that argues this perspective
    pub fn researcher(&self) -> StageId {
        match self {
            Perspective::Bullish => StageId::BullResearcher,
            Perspective::Bearish => StageId::BearResearcher,
        }
    }
}

/// One directional thesis with supporting points and aggregate confidence
///
/// Created once per run by each synthesizer and immutable after creation.
/// `points` holds one human-readable string per contributing analysis unit,
/// in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thesis {
    pub perspective: Perspective,
    pub confidence: f64,
    pub points: Vec<String>,
    pub rationale: String,
}

impl Thesis {
    /// Encode the thesis as a pipeline message
    pub fn encode(&self, producer: StageId) -> Result<Message> {
        Message::encode(producer, self)
    }

    /// Decode a thesis from a researcher's message
    pub fn decode(message: &Message) -> Result<Thesis> {
        let object = decode_payload(message)?;
        serde_json::from_value(object)
            .map_err(|e| PipelineError::decode(message.producer, format!("bad thesis: {e}")))
    }
}
