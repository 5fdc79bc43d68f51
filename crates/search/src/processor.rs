//! Padding and ranking of one topic's final results
//!
//! [`ResultProcessor::process_results`] consumes a topic's aggregated map,
//! optionally pads it, and ranks it. It must only be called once every
//! variant of the topic has been registered: padding reads the final merged
//! count.

use crate::aggregator::ResultAggregator;
use crate::padder::Padder;
use crate::ranker::Ranker;
use mathrun_core::{RankedList, TopicId};

/// Turns aggregated topic maps into ranked lists
#[derive(Debug, Clone, Default)]
pub struct ResultProcessor {
    padder: Option<Padder>,
    ranker: Ranker,
}

impl ResultProcessor {
    /// Create a processor without padding
    pub fn new(ranker: Ranker) -> Self {
        ResultProcessor {
            padder: None,
            ranker,
        }
    }

    /// Enable padding
    pub fn with_padder(mut self, padder: Padder) -> Self {
        self.padder = Some(padder);
        self
    }

    /// Padding stage, if enabled
    pub fn padder(&self) -> Option<&Padder> {
        self.padder.as_ref()
    }

    /// Ranking stage
    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Pad and rank a topic, consuming its aggregated map
    ///
    /// Returns `None` if the topic was never seen, or if it accumulated no
    /// hits at all: such topics are dropped, not written as all-filler lists.
    pub fn process_results(
        &self,
        aggregator: &ResultAggregator,
        topic: &TopicId,
    ) -> Option<RankedList> {
        let results = aggregator.take(topic)?;
        if results.is_empty() {
            tracing::warn!(
                target: "mathrun::processor",
                topic = %topic,
                "No hits retrieved, dropping topic"
            );
            return None;
        }

        let merged = results.len();
        let mut entries = results.into_entries();

        let mut padding_exhausted = false;
        if let Some(padder) = &self.padder {
            let outcome = padder.pad(topic, &mut entries);
            if outcome.exhausted {
                tracing::warn!(
                    target: "mathrun::processor",
                    topic = %topic,
                    entries = entries.len(),
                    target_len = padder.target(),
                    pool = padder.pool().len(),
                    "Filler pool exhausted before padding target"
                );
            }
            padding_exhausted = outcome.exhausted;
        }

        let list = self.ranker.rank(topic.clone(), entries, padding_exhausted);
        tracing::info!(
            target: "mathrun::processor",
            topic = %topic,
            merged,
            entries = list.len(),
            "Processed results"
        );
        Some(list)
    }
}
