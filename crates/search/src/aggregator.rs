//! Per-topic result aggregation
//!
//! Every query variant of a topic produces one backend response. The
//! [`ResultAggregator`] decodes each response and folds its hits into the
//! topic's [`TopicResults`]: one score per document, the maximum over every
//! observed (boosted) score.
//!
//! # Merge Rule
//!
//! ```text
//! effective = raw + (boost if the variant carried a formula else 0)
//! stored    = max(stored, effective)
//! ```
//!
//! Scores are never summed or averaged across variants. The merge is
//! commutative, associative and idempotent, so responses may be registered in
//! any order and from any thread.
//!
//! # Concurrency
//!
//! Topic maps live in a `DashMap`; a registration holds the shard lock of its
//! topic for the whole batch of hits, so concurrent registrations for one
//! topic are mutually exclusive while different topics proceed in parallel.

use crate::decoder::{DecodeError, ResponseDecoder};
use dashmap::DashMap;
use mathrun_core::{Hit, RankedEntry, TopicId};
use std::collections::HashMap;

// ============================================================================
// TopicResults
// ============================================================================

/// Best score per document for one topic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicResults {
    scores: HashMap<String, f64>,
}

impl TopicResults {
    /// Create an empty result map
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one effective score, keeping the maximum per document
    pub fn merge(&mut self, doc_id: impl Into<String>, score: f64) {
        self.scores
            .entry(doc_id.into())
            .and_modify(|stored| {
                if score > *stored {
                    *stored = score;
                }
            })
            .or_insert(score);
    }

    /// Stored score of a document
    pub fn get(&self, doc_id: &str) -> Option<f64> {
        self.scores.get(doc_id).copied()
    }

    /// Whether a document has an entry
    pub fn contains(&self, doc_id: &str) -> bool {
        self.scores.contains_key(doc_id)
    }

    /// Number of distinct documents
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no document has been registered
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Materialize the map as unranked retrieved entries
    pub fn into_entries(self) -> Vec<RankedEntry> {
        self.scores
            .into_iter()
            .map(|(doc_id, score)| RankedEntry::retrieved(doc_id, score))
            .collect()
    }
}

// ============================================================================
// ResultAggregator
// ============================================================================

/// Accumulates decoded hits per topic
///
/// The aggregator is the explicit aggregation context of a run: the pipeline
/// driver owns it, registers every variant's response, and then hands each
/// topic to [`crate::ResultProcessor`], which consumes that topic's map.
#[derive(Debug)]
pub struct ResultAggregator {
    boost: f64,
    decoder: ResponseDecoder,
    topics: DashMap<TopicId, TopicResults>,
}

impl ResultAggregator {
    /// Create an aggregator with a formula boost and a response decoder
    pub fn new(boost: f64, decoder: ResponseDecoder) -> Self {
        ResultAggregator {
            boost,
            decoder,
            topics: DashMap::new(),
        }
    }

    /// Configured formula boost
    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// Decode one variant's response body and merge its hits
    ///
    /// The topic is marked as seen even when the response contributes no
    /// hits. Returns the number of hits merged.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the body is not JSON or a hit entry is
    /// unusable. Nothing is merged in that case.
    pub fn register_result(
        &self,
        topic: &TopicId,
        body: &str,
        has_formula: bool,
    ) -> Result<usize, DecodeError> {
        self.ensure_topic(topic);
        let hits = self.decoder.decode_body(body)?;
        Ok(self.register_hits(topic, hits, has_formula))
    }

    /// Merge already decoded hits
    ///
    /// The boost is applied once per hit, before the max-merge.
    pub fn register_hits(
        &self,
        topic: &TopicId,
        hits: impl IntoIterator<Item = Hit>,
        has_formula: bool,
    ) -> usize {
        let boost = if has_formula { self.boost } else { 0.0 };
        let mut results = self.topics.entry(topic.clone()).or_default();
        let mut merged = 0;
        for hit in hits {
            results.merge(hit.doc_id, hit.score + boost);
            merged += 1;
        }
        merged
    }

    /// Mark a topic as seen without registering hits
    pub fn ensure_topic(&self, topic: &TopicId) {
        self.topics.entry(topic.clone()).or_default();
    }

    /// Whether a topic has been seen
    pub fn contains_topic(&self, topic: &TopicId) -> bool {
        self.topics.contains_key(topic)
    }

    /// Number of distinct documents registered for a topic
    pub fn topic_len(&self, topic: &TopicId) -> Option<usize> {
        self.topics.get(topic).map(|r| r.value().len())
    }

    /// Stored score of a document within a topic
    pub fn score(&self, topic: &TopicId, doc_id: &str) -> Option<f64> {
        self.topics.get(topic).and_then(|r| r.value().get(doc_id))
    }

    /// Copy of a topic's current map
    pub fn snapshot(&self, topic: &TopicId) -> Option<TopicResults> {
        self.topics.get(topic).map(|r| r.value().clone())
    }

    /// Number of topics seen and not yet taken
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Remove and return a topic's map
    ///
    /// A topic map is consumed exactly once; a second call returns `None`.
    pub fn take(&self, topic: &TopicId) -> Option<TopicResults> {
        self.topics.remove(topic).map(|(_, results)| results)
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(
            mathrun_core::defaults::DEFAULT_FORMULA_BOOST,
            ResponseDecoder::default(),
        )
    }
}
