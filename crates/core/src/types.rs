//! Core types for mathrun
//!
//! This module defines the foundational types:
//! - TopicId: Opaque identifier that groups every variant of one topic
//! - QueryVariant: One concrete (keywords, formula) backend request
//! - Topic: An evaluation topic with its ordered query variants
//! - Hit: A normalized (document id, score) pair returned by the backend
//! - RankedEntry / RankedList: Final per-topic output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an evaluation topic
///
/// Topic ids are opaque: they are only used as grouping keys and are written
/// back verbatim in the first column of the run file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicId(String);

impl TopicId {
    /// Create a TopicId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TopicId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One concrete backend request: keyword text plus an optional formula
///
/// An empty `formula` means the variant is keyword-only. An empty `keywords`
/// string is legal too (formula-only search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVariant {
    /// Keyword text sent as the `text` field
    pub keywords: String,
    /// Formula markup sent as the `math` field, empty if none
    pub formula: String,
}

impl QueryVariant {
    /// Create a variant from keyword text and formula markup
    pub fn new(keywords: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            formula: formula.into(),
        }
    }

    /// Create a keyword-only variant
    pub fn keywords_only(keywords: impl Into<String>) -> Self {
        Self::new(keywords, String::new())
    }

    /// Whether hits from this variant receive the formula boost
    pub fn has_formula(&self) -> bool {
        !self.formula.is_empty()
    }
}

/// An evaluation topic with its ordered query variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic identifier
    pub id: TopicId,
    /// Variants in issue order
    pub variants: Vec<QueryVariant>,
}

impl Topic {
    /// Create a topic with no variants
    pub fn new(id: impl Into<TopicId>) -> Self {
        Self {
            id: id.into(),
            variants: Vec::new(),
        }
    }

    /// Builder-style variant append
    pub fn with_variant(mut self, variant: QueryVariant) -> Self {
        self.variants.push(variant);
        self
    }
}

/// A single backend hit after response-shape normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Document identifier
    pub doc_id: String,
    /// Raw relevance score as returned by the backend
    pub score: f64,
}

impl Hit {
    /// Create a hit
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

/// Where a ranked entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitOrigin {
    /// Retrieved by at least one query variant
    Retrieved,
    /// Drawn from the filler pool during padding
    Filler,
}

/// One row of a topic's final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Document identifier
    pub doc_id: String,
    /// Final score (boost already applied, 0 for filler)
    pub score: f64,
    /// 1-based rank within the topic
    pub rank: u32,
    /// Retrieved or filler
    pub origin: HitOrigin,
}

impl RankedEntry {
    /// Create an unranked retrieved entry
    pub fn retrieved(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
            rank: 0,
            origin: HitOrigin::Retrieved,
        }
    }

    /// Create an unranked zero-score filler entry
    pub fn filler(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            score: 0.0,
            rank: 0,
            origin: HitOrigin::Filler,
        }
    }

    /// Whether this entry was added by padding
    pub fn is_filler(&self) -> bool {
        self.origin == HitOrigin::Filler
    }
}

/// Final ranked output of one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    /// Topic the ranking belongs to
    pub topic: TopicId,
    /// Entries sorted by score descending, ranks assigned
    pub entries: Vec<RankedEntry>,
    /// Whether entries were cut off at the maximum depth
    pub truncated: bool,
    /// Whether padding ran out of filler before reaching its target
    pub padding_exhausted: bool,
}

impl RankedList {
    /// Number of ranked entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of filler entries in the list
    pub fn filler_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_filler()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_id_display_is_verbatim() {
        let id = TopicId::new("NTCIR11-Math-12");
        assert_eq!(id.to_string(), "NTCIR11-Math-12");
        assert_eq!(id.as_str(), "NTCIR11-Math-12");
    }

    #[test]
    fn test_query_variant_has_formula() {
        assert!(QueryVariant::new("sum", "<m:apply/>").has_formula());
        assert!(!QueryVariant::keywords_only("sum").has_formula());
        assert!(!QueryVariant::new("", "").has_formula());
    }

    #[test]
    fn test_topic_builder_keeps_order() {
        let topic = Topic::new("T1")
            .with_variant(QueryVariant::new("a", "f1"))
            .with_variant(QueryVariant::keywords_only("a"));
        assert_eq!(topic.id, TopicId::from("T1"));
        assert_eq!(topic.variants.len(), 2);
        assert!(topic.variants[0].has_formula());
        assert!(!topic.variants[1].has_formula());
    }

    #[test]
    fn test_filler_entry_has_zero_score() {
        let entry = RankedEntry::filler("f1");
        assert_eq!(entry.score, 0.0);
        assert!(entry.is_filler());
        assert!(!RankedEntry::retrieved("d", 1.0).is_filler());
    }

    #[test]
    fn test_ranked_list_filler_count() {
        let list = RankedList {
            topic: TopicId::from("T1"),
            entries: vec![
                RankedEntry::retrieved("a", 2.0),
                RankedEntry::filler("f1"),
                RankedEntry::filler("f2"),
            ],
            truncated: false,
            padding_exhausted: false,
        };
        assert_eq!(list.len(), 3);
        assert_eq!(list.filler_count(), 2);
    }

    #[test]
    fn test_hit_serde_round_trip() {
        let hit = Hit::new("docA", 1.25);
        let json = serde_json::to_string(&hit).unwrap();
        let parsed: Hit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hit);
    }
}
