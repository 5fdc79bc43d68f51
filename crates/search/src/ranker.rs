//! Final ranking and truncation
//!
//! Entries are sorted by score descending with a deterministic tie-break on
//! document id (ascending), truncated to the maximum depth, and assigned
//! 1-based ranks.

use mathrun_core::defaults::DEFAULT_MAX_DEPTH;
use mathrun_core::{RankedEntry, RankedList, TopicId};
use std::cmp::Ordering;

/// Total order used for ranking
///
/// 1. Score descending (`f64::total_cmp`)
/// 2. Document id ascending
pub fn compare_entries(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Sorts and truncates entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    max_depth: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Ranker {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Ranker {
    /// Create a ranker with a custom output depth
    ///
    /// Ranks are `u32`, so the depth is capped at `u32::MAX`.
    pub fn new(max_depth: usize) -> Self {
        Ranker {
            max_depth: max_depth.min(u32::MAX as usize),
        }
    }

    /// Get the output depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Rank a topic's entries
    pub fn rank(
        &self,
        topic: TopicId,
        mut entries: Vec<RankedEntry>,
        padding_exhausted: bool,
    ) -> RankedList {
        entries.sort_by(compare_entries);

        let truncated = entries.len() > self.max_depth;
        entries.truncate(self.max_depth);

        for (rank, entry) in (1..=u32::MAX).zip(entries.iter_mut()) {
            entry.rank = rank;
        }

        RankedList {
            topic,
            entries,
            truncated,
            padding_exhausted,
        }
    }
}
