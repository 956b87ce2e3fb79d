//! Core abstractions for the trading decision pipeline
//!
//! This crate defines the fundamental types threaded through every pipeline
//! stage: the append-only message log, the stage identity and trait, the
//! signal and thesis codecs, and the error taxonomy.

pub mod config;
pub mod error;
pub mod signal;
pub mod stage;
pub mod state;
pub mod thesis;

pub use config::{Portfolio, RunConfig};
pub use error::{PipelineError, Result};
pub use signal::{Direction, Signal};
pub use stage::{AnalystId, Stage, StageId};
pub use state::{Message, PipelineState, keys};
pub use thesis::{Perspective, Thesis};
