//! Error types for mathrun
//!
//! This module defines all error types used throughout the pipeline.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Errors that stem from a single backend exchange carry the topic id and the
//! zero-based index of the query variant that triggered them, so a halted
//! batch can say exactly where it stopped.

use crate::types::TopicId;
use std::io;
use thiserror::Error;

/// Result type alias for mathrun operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mathrun
#[derive(Debug, Error)]
pub enum Error {
    /// Backend response could not be decoded
    #[error("malformed response for topic {topic} (variant {variant}): {reason}")]
    MalformedResponse {
        /// Topic whose variant produced the response
        topic: TopicId,
        /// Zero-based index of the query variant
        variant: usize,
        /// Decoder message
        reason: String,
    },

    /// Search backend request failed
    #[error("backend request failed for topic {topic} (variant {variant}): {reason}")]
    Backend {
        /// Topic whose variant was being issued
        topic: TopicId,
        /// Zero-based index of the query variant
        variant: usize,
        /// Transport or status message
        reason: String,
    },

    /// Topic input could not be read
    #[error("topic input error: {reason}")]
    Topics {
        /// What went wrong
        reason: String,
    },

    /// Invalid or unreadable configuration
    #[error("configuration error: {reason}")]
    Config {
        /// What went wrong
        reason: String,
    },

    /// I/O error (filler pool, run file, topic file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a MalformedResponse error
    pub fn malformed_response(
        topic: &TopicId,
        variant: usize,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::MalformedResponse {
            topic: topic.clone(),
            variant,
            reason: reason.to_string(),
        }
    }

    /// Create a Backend error
    pub fn backend(topic: &TopicId, variant: usize, reason: impl std::fmt::Display) -> Self {
        Error::Backend {
            topic: topic.clone(),
            variant,
            reason: reason.to_string(),
        }
    }

    /// Create a Topics error
    pub fn topics(reason: impl Into<String>) -> Self {
        Error::Topics {
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Topic the error is attributed to, if any
    pub fn topic(&self) -> Option<&TopicId> {
        match self {
            Error::MalformedResponse { topic, .. } | Error::Backend { topic, .. } => Some(topic),
            _ => None,
        }
    }
}
