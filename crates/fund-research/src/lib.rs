//! Thesis synthesizers for the trading pipeline
//!
//! The bull and bear researchers are symmetric: each reads the signals of
//! exactly the analysts selected for the run, turns agreement into a quoted
//! confidence and disagreement into a damped caveat, and aggregates the
//! per-unit scores into one directional thesis. Both are pure functions of
//! the pipeline state, so their output is independent of the order analyst
//! messages were appended.

pub mod researcher;
pub mod sink;
pub mod synthesizer;

pub use researcher::ResearcherStage;
pub use sink::{ReasoningSink, TracingSink};
pub use synthesizer::{DISAGREEMENT_SCORE, synthesize};
