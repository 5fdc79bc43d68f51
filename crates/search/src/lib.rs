//! Result aggregation, padding and ranking for mathrun
//!
//! This crate provides:
//! - ResponseShape trait and the flat/nested backend response decoders
//! - ResultAggregator: per-topic max-merge of boosted hits
//! - FillerPool and Padder: top-up of under-filled topics
//! - Ranker: score-descending sort with deterministic tie-break and truncation
//! - ResultProcessor: pad + rank of one topic's final results
//!
//! # Usage
//!
//! ```ignore
//! use mathrun_search::{ResultAggregator, ResultProcessor};
//!
//! let aggregator = ResultAggregator::default();
//! aggregator.register_result(&topic, &body, variant.has_formula())?;
//! let ranked = ResultProcessor::default().process_results(&aggregator, &topic);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod decoder;
pub mod filler;
pub mod padder;
pub mod processor;
pub mod ranker;

// Re-export commonly used types
pub use aggregator::{ResultAggregator, TopicResults};
pub use decoder::{
    DecodeError, FlatShape, NestedShape, ResponseDecoder, ResponseFormat, ResponseShape,
};
pub use filler::{topic_rng, FillerPool};
pub use padder::{Padder, PaddingOutcome};
pub use processor::ResultProcessor;
pub use ranker::{compare_entries, Ranker};
