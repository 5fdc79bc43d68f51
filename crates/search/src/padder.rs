//! Padding of under-filled topics
//!
//! A topic whose merged result set is smaller than the padding target is
//! topped up with zero-score filler ids drawn from its own shuffled copy of
//! the [`FillerPool`]. Exactly one pass is made over that copy: if it runs
//! out first, the topic stays short and the outcome says so.

use crate::filler::{topic_rng, FillerPool};
use mathrun_core::{RankedEntry, TopicId};
use std::collections::HashSet;
use std::sync::Arc;

/// What a padding pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingOutcome {
    /// Number of filler entries appended
    pub added: usize,
    /// Whether the pool ran out before the target was reached
    pub exhausted: bool,
}

/// Tops up result sets to a target size from a filler pool
#[derive(Debug, Clone)]
pub struct Padder {
    pool: Arc<FillerPool>,
    target: usize,
    seed: Option<u64>,
}

impl Padder {
    /// Create a padder over a shared pool
    pub fn new(pool: Arc<FillerPool>, target: usize) -> Self {
        Padder {
            pool,
            target,
            seed: None,
        }
    }

    /// Derive every topic's shuffle from a fixed seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Padding target
    pub fn target(&self) -> usize {
        self.target
    }

    /// Shared filler pool
    pub fn pool(&self) -> &FillerPool {
        &self.pool
    }

    /// Pad a topic's entries using the topic's own shuffled pool order
    pub fn pad(&self, topic: &TopicId, entries: &mut Vec<RankedEntry>) -> PaddingOutcome {
        if entries.len() >= self.target {
            return PaddingOutcome::default();
        }
        let mut rng = topic_rng(self.seed, topic);
        let order = self.pool.shuffled(&mut rng);
        self.pad_with_order(entries, order)
    }

    /// Pad using an explicit candidate order
    ///
    /// Candidates already present in `entries` (or drawn earlier in this
    /// pass) are skipped. Each accepted id is first reserved, then appended
    /// with its final zero score.
    pub fn pad_with_order<'a>(
        &self,
        entries: &mut Vec<RankedEntry>,
        order: impl IntoIterator<Item = &'a str>,
    ) -> PaddingOutcome {
        let mut reserved: HashSet<String> = entries.iter().map(|e| e.doc_id.clone()).collect();
        let mut added = 0;

        for candidate in order {
            if entries.len() >= self.target {
                break;
            }
            if !reserved.insert(candidate.to_string()) {
                continue;
            }
            entries.push(RankedEntry::filler(candidate));
            added += 1;
        }

        PaddingOutcome {
            added,
            exhausted: entries.len() < self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(ids: &[&str]) -> Arc<FillerPool> {
        Arc::new(FillerPool::new(ids.iter().map(|s| s.to_string()).collect()))
    }

    fn retrieved(ids: &[&str]) -> Vec<RankedEntry> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RankedEntry::retrieved(*id, 1.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_pad_in_given_order() {
        let padder = Padder::new(pool(&["f1", "f2", "f3"]), 5);
        let mut entries = retrieved(&["a", "b", "c"]);
        let outcome = padder.pad_with_order(&mut entries, ["f2", "f1", "f3"]);
        assert_eq!(outcome, PaddingOutcome { added: 2, exhausted: false });
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[3].doc_id, "f2");
        assert_eq!(entries[4].doc_id, "f1");
        assert!(entries[3].is_filler() && entries[4].is_filler());
        assert_eq!(entries[3].score, 0.0);
    }

    #[test]
    fn test_pad_skips_existing_ids() {
        let padder = Padder::new(pool(&[]), 4);
        let mut entries = retrieved(&["a", "b"]);
        let outcome = padder.pad_with_order(&mut entries, ["a", "x", "b", "y", "z"]);
        assert_eq!(outcome.added, 2);
        let ids: Vec<&str> = entries.iter().map(|e| e.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_pad_skips_duplicate_candidates() {
        let padder = Padder::new(pool(&[]), 4);
        let mut entries = retrieved(&["a"]);
        let outcome = padder.pad_with_order(&mut entries, ["x", "x", "y"]);
        assert_eq!(outcome, PaddingOutcome { added: 2, exhausted: true });
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_pad_exhausted_pool_leaves_list_short() {
        let padder = Padder::new(pool(&["f1", "f2"]), 10);
        let mut entries = retrieved(&["a"]);
        let outcome = padder.pad(&TopicId::from("T"), &mut entries);
        assert_eq!(outcome.added, 2);
        assert!(outcome.exhausted);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_pad_noop_when_already_full() {
        let padder = Padder::new(pool(&["f1"]), 2);
        let mut entries = retrieved(&["a", "b", "c"]);
        let outcome = padder.pad(&TopicId::from("T"), &mut entries);
        assert_eq!(outcome, PaddingOutcome::default());
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_seeded_padding_is_reproducible() {
        let ids: Vec<String> = (0..30).map(|i| format!("f{}", i)).collect();
        let padder = Padder::new(Arc::new(FillerPool::new(ids)), 10).with_seed(Some(9));
        let t = TopicId::from("T");

        let mut first = retrieved(&["a"]);
        let mut second = retrieved(&["a"]);
        padder.pad(&t, &mut first);
        padder.pad(&t, &mut second);
        assert_eq!(first, second);
    }
}
