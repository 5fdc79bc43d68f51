//! Filler pool for padding under-filled topics
//!
//! The pool is a fixed list of document ids unrelated to any topic. It is
//! loaded once and never mutated; each topic derives its own shuffled order
//! from it, so there is no cursor shared between topics.

use mathrun_core::{Result, TopicId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// Immutable list of filler document ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillerPool {
    ids: Vec<String>,
}

impl FillerPool {
    /// Create a pool from ids, kept as given
    pub fn new(ids: Vec<String>) -> Self {
        FillerPool { ids }
    }

    /// Parse a newline-delimited id list
    ///
    /// Surrounding whitespace (including `\r`) is trimmed and blank lines are
    /// skipped.
    pub fn from_lines(text: &str) -> Self {
        let ids = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        FillerPool { ids }
    }

    /// Read a newline-delimited id list from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let pool = Self::from_lines(&text);
        tracing::debug!(
            target: "mathrun::filler",
            path = %path.display(),
            ids = pool.len(),
            "Loaded filler pool"
        );
        Ok(pool)
    }

    /// Number of ids in the pool
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in load order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// A fresh random order over the pool
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&str> {
        let mut order: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        order.shuffle(rng);
        order
    }
}

/// Random source for one topic's padding pass
///
/// With a seed, the generator depends only on the seed and the topic id, so a
/// topic pads identically no matter which topics were processed before it.
/// Without a seed, the generator is drawn from OS entropy.
pub fn topic_rng(seed: Option<u64>, topic: &TopicId) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ xxh3_64(topic.as_str().as_bytes())),
        None => StdRng::from_entropy(),
    }
}
