//! Backend response decoding
//!
//! The search backend answers in one of two JSON shapes:
//!
//! ```text
//! flat:    { "hits": [ { "id": "docA", "score": 1.2 }, ... ] }
//! nested:  { "hits": { "hits": [ { "_id": "docA", "_score": 1.2 }, ... ] } }
//! ```
//!
//! Each shape is a [`ResponseShape`] that turns the parsed payload into the
//! same normalized `Vec<Hit>`. The merge logic never looks at the raw payload.
//! A new backend shape is one more `ResponseShape` implementation registered
//! on the [`ResponseDecoder`].
//!
//! A body that is not JSON at all is an error. A well-formed body without a
//! usable hits container decodes to zero hits.

use mathrun_core::Hit;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while decoding a backend response
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A hit entry is missing its id or score, or has the wrong type
    #[error("invalid hit at index {index} ({shape} shape): {reason}")]
    InvalidHit {
        /// Name of the shape that was decoding
        shape: &'static str,
        /// Position of the entry in the hits array
        index: usize,
        /// serde message
        reason: String,
    },
}

// ============================================================================
// ResponseShape
// ============================================================================

/// One backend response schema
///
/// # Thread Safety
///
/// Shapes must be Send + Sync; a single decoder is shared by every
/// registration call, possibly from several threads.
pub trait ResponseShape: Send + Sync {
    /// Name for debugging and logging
    fn name(&self) -> &'static str;

    /// Whether the payload's hits container has this shape
    fn matches(&self, payload: &Value) -> bool;

    /// Extract normalized hits
    ///
    /// A missing or empty hits container yields an empty vector.
    fn decode(&self, payload: &Value) -> Result<Vec<Hit>, DecodeError>;
}

/// Document ids are strings on the wire, but numeric ids are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocIdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl From<DocIdRepr> for String {
    fn from(repr: DocIdRepr) -> Self {
        match repr {
            DocIdRepr::Text(s) => s,
            DocIdRepr::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct FlatHit {
    id: DocIdRepr,
    score: f64,
}

impl From<FlatHit> for Hit {
    fn from(hit: FlatHit) -> Self {
        Hit::new(hit.id, hit.score)
    }
}

#[derive(Deserialize)]
struct NestedHit {
    #[serde(rename = "_id")]
    id: DocIdRepr,
    #[serde(rename = "_score")]
    score: f64,
}

impl From<NestedHit> for Hit {
    fn from(hit: NestedHit) -> Self {
        Hit::new(hit.id, hit.score)
    }
}

fn decode_entries<T>(shape: &'static str, entries: &[Value]) -> Result<Vec<Hit>, DecodeError>
where
    T: DeserializeOwned + Into<Hit>,
{
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            T::deserialize(entry)
                .map(Into::into)
                .map_err(|e| DecodeError::InvalidHit {
                    shape,
                    index,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// `{"hits": [{"id", "score"}]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatShape;

impl ResponseShape for FlatShape {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn matches(&self, payload: &Value) -> bool {
        matches!(payload.get("hits"), Some(Value::Array(_)))
    }

    fn decode(&self, payload: &Value) -> Result<Vec<Hit>, DecodeError> {
        match payload.get("hits") {
            Some(Value::Array(entries)) => decode_entries::<FlatHit>(self.name(), entries),
            _ => Ok(Vec::new()),
        }
    }
}

/// `{"hits": {"hits": [{"_id", "_score"}]}}`
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedShape;

impl ResponseShape for NestedShape {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn matches(&self, payload: &Value) -> bool {
        matches!(payload.get("hits"), Some(Value::Object(_)))
    }

    fn decode(&self, payload: &Value) -> Result<Vec<Hit>, DecodeError> {
        match payload.get("hits").and_then(|outer| outer.get("hits")) {
            Some(Value::Array(entries)) => decode_entries::<NestedHit>(self.name(), entries),
            _ => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// ResponseDecoder
// ============================================================================

/// Which response shapes a decoder accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Detect the shape per response
    #[default]
    Auto,
    /// Flat list only
    Flat,
    /// Nested list only
    Nested,
}

/// Decodes raw response bodies into normalized hits
///
/// Holds an ordered list of shapes; the first shape that recognizes a payload
/// decodes it. If none does, the payload contributes zero hits.
pub struct ResponseDecoder {
    shapes: Vec<Box<dyn ResponseShape>>,
}

impl ResponseDecoder {
    /// Create a decoder with no shapes (every payload decodes to zero hits)
    pub fn empty() -> Self {
        ResponseDecoder { shapes: Vec::new() }
    }

    /// Create a decoder for a configured format
    pub fn for_format(format: ResponseFormat) -> Self {
        match format {
            ResponseFormat::Auto => Self::empty()
                .with_shape(Box::new(FlatShape))
                .with_shape(Box::new(NestedShape)),
            ResponseFormat::Flat => Self::empty().with_shape(Box::new(FlatShape)),
            ResponseFormat::Nested => Self::empty().with_shape(Box::new(NestedShape)),
        }
    }

    /// Register an additional shape (tried after the existing ones)
    pub fn with_shape(mut self, shape: Box<dyn ResponseShape>) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Names of the registered shapes, in trial order
    pub fn shape_names(&self) -> Vec<&'static str> {
        self.shapes.iter().map(|s| s.name()).collect()
    }

    /// Parse and decode a response body
    pub fn decode_body(&self, body: &str) -> Result<Vec<Hit>, DecodeError> {
        let payload: Value = serde_json::from_str(body)?;
        self.decode_value(&payload)
    }

    /// Decode an already parsed payload
    pub fn decode_value(&self, payload: &Value) -> Result<Vec<Hit>, DecodeError> {
        match self.shapes.iter().find(|shape| shape.matches(payload)) {
            Some(shape) => {
                tracing::debug!(target: "mathrun::decoder", shape = shape.name(), "Decoding response");
                shape.decode(payload)
            }
            None => Ok(Vec::new()),
        }
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::for_format(ResponseFormat::Auto)
    }
}

impl std::fmt::Debug for ResponseDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseDecoder")
            .field("shapes", &self.shape_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_shape_decodes() {
        let decoder = ResponseDecoder::for_format(ResponseFormat::Flat);
        let hits = decoder
            .decode_body(r#"{"hits":[{"id":"docA","score":1.2},{"id":"docB","score":3.4}]}"#)
            .unwrap();
        assert_eq!(hits, vec![Hit::new("docA", 1.2), Hit::new("docB", 3.4)]);
    }

    #[test]
    fn test_nested_shape_decodes() {
        let decoder = ResponseDecoder::for_format(ResponseFormat::Nested);
        let hits = decoder
            .decode_body(r#"{"took":3,"hits":{"total":1,"hits":[{"_id":"docA","_score":2.5}]}}"#)
            .unwrap();
        assert_eq!(hits, vec![Hit::new("docA", 2.5)]);
    }

    #[test]
    fn test_auto_accepts_both_shapes() {
        let decoder = ResponseDecoder::default();
        let flat = decoder
            .decode_body(r#"{"hits":[{"id":"x","score":1.0}]}"#)
            .unwrap();
        let nested = decoder
            .decode_body(r#"{"hits":{"hits":[{"_id":"x","_score":1.0}]}}"#)
            .unwrap();
        assert_eq!(flat, nested);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let decoder = ResponseDecoder::default();
        let err = decoder.decode_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
    }

    #[test]
    fn test_missing_hits_is_empty() {
        let decoder = ResponseDecoder::default();
        assert!(decoder.decode_body(r#"{"error":"none"}"#).unwrap().is_empty());
        assert!(decoder.decode_body(r#"{"hits":null}"#).unwrap().is_empty());
        assert!(decoder.decode_body("[]").unwrap().is_empty());
    }

    #[test]
    fn test_empty_hits_object_is_empty() {
        let decoder = ResponseDecoder::default();
        assert!(decoder.decode_body(r#"{"hits":{}}"#).unwrap().is_empty());
        assert!(decoder.decode_body(r#"{"hits":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_fixed_format_ignores_other_shape() {
        let nested_only = ResponseDecoder::for_format(ResponseFormat::Nested);
        let hits = nested_only
            .decode_body(r#"{"hits":[{"id":"x","score":1.0}]}"#)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_hit_missing_score_is_error() {
        let decoder = ResponseDecoder::default();
        let err = decoder
            .decode_body(r#"{"hits":[{"id":"a","score":1.0},{"id":"b"}]}"#)
            .unwrap_err();
        match err {
            DecodeError::InvalidHit { shape, index, .. } => {
                assert_eq!(shape, "flat");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_doc_id_is_accepted() {
        let decoder = ResponseDecoder::default();
        let hits = decoder
            .decode_body(r#"{"hits":[{"id":42,"score":0.5}]}"#)
            .unwrap();
        assert_eq!(hits[0].doc_id, "42");
    }

    #[test]
    fn test_integer_score_is_accepted() {
        let decoder = ResponseDecoder::default();
        let hits = decoder
            .decode_body(r#"{"hits":{"hits":[{"_id":"a","_score":3}]}}"#)
            .unwrap();
        assert_eq!(hits[0].score, 3.0);
    }

    #[test]
    fn test_custom_shape_can_be_registered() {
        struct ResultsShape;
        impl ResponseShape for ResultsShape {
            fn name(&self) -> &'static str {
                "results"
            }
            fn matches(&self, payload: &Value) -> bool {
                payload.get("results").is_some()
            }
            fn decode(&self, payload: &Value) -> Result<Vec<Hit>, DecodeError> {
                Ok(payload["results"]
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(|v| v.as_str())
                            .map(|id| Hit::new(id, 1.0))
                            .collect()
                    })
                    .unwrap_or_default())
            }
        }

        let decoder = ResponseDecoder::default().with_shape(Box::new(ResultsShape));
        assert_eq!(decoder.shape_names(), vec!["flat", "nested", "results"]);
        let hits = decoder.decode_body(r#"{"results":["a","b"]}"#).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_response_format_serde_names() {
        let format: ResponseFormat = serde_json::from_str("\"nested\"").unwrap();
        assert_eq!(format, ResponseFormat::Nested);
        assert_eq!(serde_json::to_string(&ResponseFormat::Auto).unwrap(), "\"auto\"");
    }
}
