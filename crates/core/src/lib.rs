//! Core types for mathrun
//!
//! This crate defines the foundational types used throughout the system:
//! - TopicId, Topic, QueryVariant: the evaluation queries fed to the backend
//! - Hit: a normalized (document id, score) pair returned by the backend
//! - RankedEntry, RankedList: the per-topic output of padding and ranking
//! - Error: Error type hierarchy
//! - Defaults: configuration defaults shared by every crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod defaults;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Hit, HitOrigin, QueryVariant, RankedEntry, RankedList, Topic, TopicId};
