//! HTTP form-POST client for the text+math search daemon
//!
//! Every variant is one `application/x-www-form-urlencoded` POST with the
//! fields `text`, `math`, `from` and `size`. The response body is returned
//! untouched.

use crate::{BackendError, SearchBackend};
use mathrun_core::defaults::{DEFAULT_BACKEND_URL, DEFAULT_PAGE_FROM, DEFAULT_PAGE_SIZE};
use mathrun_core::QueryVariant;
use std::time::Duration;

/// Blocking HTTP backend
pub struct HttpBackend {
    url: String,
    from: usize,
    size: usize,
    timeout: Option<Duration>,
    agent: ureq::Agent,
}

impl HttpBackend {
    /// Create a client for `url` with pagination parameters
    ///
    /// `timeout` bounds each request end to end; `None` waits indefinitely.
    pub fn new(url: impl Into<String>, from: usize, size: usize, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        let agent = ureq::Agent::new_with_config(config);

        HttpBackend {
            url: url.into(),
            from,
            size,
            timeout,
            agent,
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Form fields sent for a variant
    pub fn form_fields(&self, variant: &QueryVariant) -> [(&'static str, String); 4] {
        [
            ("text", variant.keywords.clone()),
            ("math", variant.formula.clone()),
            ("from", self.from.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL, DEFAULT_PAGE_FROM, DEFAULT_PAGE_SIZE, None)
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("url", &self.url)
            .field("from", &self.from)
            .field("size", &self.size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn map_ureq_error(e: ureq::Error) -> BackendError {
    match e {
        ureq::Error::StatusCode(code) => BackendError::Status(code),
        ureq::Error::Timeout(_) => BackendError::Timeout,
        other => BackendError::Network(other.to_string()),
    }
}

impl SearchBackend for HttpBackend {
    fn query(&self, variant: &QueryVariant) -> Result<String, BackendError> {
        tracing::debug!(
            target: "mathrun::backend",
            url = %self.url,
            has_formula = variant.has_formula(),
            "Issuing query"
        );

        let fields = self.form_fields(variant);
        let mut response = self
            .agent
            .post(&self.url)
            .send_form(fields.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(map_ureq_error)?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| BackendError::Network(format!("failed to read response: {}", e)))
    }

    fn name(&self) -> &str {
        "http"
    }
}
