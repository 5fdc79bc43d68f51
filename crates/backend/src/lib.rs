//! Search backend access for mathrun
//!
//! This crate provides:
//! - SearchBackend trait: one query variant in, one raw response body out
//! - BackendError: transport-level failures
//! - HttpBackend: form-POST client for the text+math search daemon
//!
//! The backend only moves bytes. Decoding the response is the aggregator's
//! job, so a new response shape never touches this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod http;

use mathrun_core::QueryVariant;
use std::fmt;
use std::sync::Arc;

pub use http::HttpBackend;

// ============================================================================
// Error Type
// ============================================================================

/// Errors that can occur when calling the search backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// HTTP request failed (network unreachable, connection refused, etc.)
    Network(String),
    /// Backend answered with a non-success status
    Status(u16),
    /// Request timed out
    Timeout,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {}", msg),
            BackendError::Status(code) => write!(f, "backend returned HTTP status {}", code),
            BackendError::Timeout => write!(f, "backend request timed out"),
        }
    }
}

impl std::error::Error for BackendError {}

// ============================================================================
// SearchBackend Trait
// ============================================================================

/// A search service that answers one query variant at a time
///
/// # Thread Safety
///
/// Backends must be Send + Sync: variants of one topic may be issued from
/// several worker threads at once.
pub trait SearchBackend: Send + Sync {
    /// Issue one variant and return the raw response body
    fn query(&self, variant: &QueryVariant) -> Result<String, BackendError>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    fn query(&self, variant: &QueryVariant) -> Result<String, BackendError> {
        (**self).query(variant)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn query(&self, variant: &QueryVariant) -> Result<String, BackendError> {
        (**self).query(variant)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
