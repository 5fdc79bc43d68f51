//! Run driver for mathrun
//!
//! This crate ties the lower layers together:
//! - RunConfig: `mathrun.toml` loading, validation and component construction
//! - RunPipeline: per-topic issue, aggregate, pad, rank and write
//! - RunWriter: tab-separated run-file output
//!
//! The engine is the only component that knows about:
//! - Topic ordering and streaming of finished topics
//! - Attributing failures to a topic and variant

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod pipeline;
pub mod writer;

pub use config::{
    BackendConfig, ConcurrencyConfig, PaddingConfig, Profile, RunConfig, ScoringConfig,
    CONFIG_FILE_NAME,
};
pub use pipeline::{execute, RunPipeline, RunSummary};
pub use writer::{format_row, format_score, RunWriter};
