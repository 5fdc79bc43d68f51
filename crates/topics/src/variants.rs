//! Expansion of raw topics into query variants
//!
//! Two policies reproduce the two NTCIR-11 tasks:
//!
//! | Policy | `text` field      | Variants                                   |
//! |--------|-------------------|--------------------------------------------|
//! | ntcir  | joined keywords   | one per formula, then one keyword-only     |
//! | wiki   | always empty      | one per formula                            |

use crate::reader::{parse_topics, RawTopic};
use mathrun_core::{Error, QueryVariant, Result, Topic, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// How a raw topic turns into query variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPolicy {
    /// Send the topic's keywords (joined by one space) as `text`
    pub include_keywords: bool,
    /// Append one keyword-only variant after the formula variants
    pub keyword_only_variant: bool,
}

impl VariantPolicy {
    /// NTCIR-11 Math task: keywords with every formula, plus keywords alone
    pub fn ntcir() -> Self {
        VariantPolicy {
            include_keywords: true,
            keyword_only_variant: true,
        }
    }

    /// NTCIR-11 Wikipedia task: formulas only
    pub fn wiki() -> Self {
        VariantPolicy {
            include_keywords: false,
            keyword_only_variant: false,
        }
    }

    /// Expand one raw topic
    pub fn expand(&self, raw: RawTopic) -> Topic {
        let text = if self.include_keywords {
            raw.keywords.join(" ")
        } else {
            String::new()
        };

        let mut variants: Vec<QueryVariant> = raw
            .formulas
            .into_iter()
            .map(|formula| QueryVariant::new(text.clone(), formula))
            .collect();
        if self.keyword_only_variant {
            variants.push(QueryVariant::keywords_only(text));
        }

        Topic {
            id: raw.id,
            variants,
        }
    }
}

impl Default for VariantPolicy {
    fn default() -> Self {
        Self::ntcir()
    }
}

/// Ordered, variant-expanded topics
///
/// Topics that share an id are merged into the first occurrence, their
/// variants appended in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicSource {
    topics: Vec<Topic>,
}

impl TopicSource {
    /// Expand raw topics under a policy
    pub fn from_raw(raw: impl IntoIterator<Item = RawTopic>, policy: VariantPolicy) -> Self {
        let mut topics: Vec<Topic> = Vec::new();
        let mut index: HashMap<TopicId, usize> = HashMap::new();

        for topic in raw.into_iter().map(|r| policy.expand(r)) {
            match index.get(&topic.id) {
                Some(&i) => {
                    tracing::debug!(
                        target: "mathrun::topics",
                        topic = %topic.id,
                        "Merging repeated topic id"
                    );
                    topics[i].variants.extend(topic.variants);
                }
                None => {
                    index.insert(topic.id.clone(), topics.len());
                    topics.push(topic);
                }
            }
        }

        TopicSource { topics }
    }

    /// Parse and expand a topic document
    pub fn parse(xml: &str, policy: VariantPolicy) -> Result<Self> {
        Ok(Self::from_raw(parse_topics(xml)?, policy))
    }

    /// Read, parse and expand a topic file
    pub fn load(path: &Path, policy: VariantPolicy) -> Result<Self> {
        let xml = std::fs::read_to_string(path).map_err(|e| {
            Error::topics(format!(
                "Failed to read topic file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let source = Self::parse(&xml, policy)?;
        tracing::info!(
            target: "mathrun::topics",
            path = %path.display(),
            topics = source.len(),
            variants = source.variant_count(),
            "Loaded topics"
        );
        Ok(source)
    }

    /// Number of distinct topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether there are no topics
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Total number of variants over all topics
    pub fn variant_count(&self) -> usize {
        self.topics.iter().map(|t| t.variants.len()).sum()
    }

    /// Topics in document order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Consume into topics
    pub fn into_topics(self) -> Vec<Topic> {
        self.topics
    }
}

impl From<Vec<Topic>> for TopicSource {
    fn from(topics: Vec<Topic>) -> Self {
        TopicSource { topics }
    }
}
