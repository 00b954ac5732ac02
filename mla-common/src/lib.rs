//! # MLA Common Library
//!
//! Shared code for the MIDI Advisor client crates:
//! - Analysis, recommendation and result-bundle models (wire format)
//! - Human-readable formatting of sizes, durations and tempos
//! - TOML bootstrap configuration
//! - Common error type

pub mod config;
pub mod error;
pub mod human_format;
pub mod models;

pub use error::{Error, Result};
pub use models::{AnalysisResult, RecommendationSet, ResultBundle};
