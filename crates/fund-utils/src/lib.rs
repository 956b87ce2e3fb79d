//! Shared utilities for the trading pipeline
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and analysis-window date handling.

pub mod dates;
pub mod logging;

pub use dates::{DateRangeError, resolve_window};
pub use logging::init_tracing;
