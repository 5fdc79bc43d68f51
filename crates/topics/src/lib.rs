//! Topic input for mathrun
//!
//! This crate provides:
//! - parse_topics: raw topic records from an NTCIR-style topic XML document
//! - VariantPolicy: how a raw topic expands into query variants
//! - TopicSource: parsed, variant-expanded topics ready for the pipeline

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod reader;
pub mod variants;

pub use reader::{parse_topics, RawTopic};
pub use variants::{TopicSource, VariantPolicy};
