//! Run-file writer
//!
//! One tab-separated row per ranked entry:
//!
//! ```text
//! topicId  1  documentId  rank  score  runTag
//! ```
//!
//! Rows are written in rank order exactly as the ranked list holds them. The
//! sink is flushed after every topic, so topics written before a failure stay
//! in the file.

use mathrun_core::{RankedEntry, RankedList, Result, TopicId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render a score column
///
/// Filler entries are written as `0`. Retrieved scores use the shortest
/// decimal that reads back to the same value, always with a fractional part
/// (`6.0`, `3.4`).
pub fn format_score(entry: &RankedEntry) -> String {
    if entry.is_filler() {
        return "0".to_string();
    }
    let text = entry.score.to_string();
    if entry.score.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Render one row, without the line terminator
pub fn format_row(topic: &TopicId, entry: &RankedEntry, run_tag: &str) -> String {
    format!(
        "{}\t1\t{}\t{}\t{}\t{}",
        topic,
        entry.doc_id,
        entry.rank,
        format_score(entry),
        run_tag
    )
}

/// Streams ranked lists into a run file
#[derive(Debug)]
pub struct RunWriter<W: Write> {
    out: W,
    run_tag: String,
}

impl RunWriter<BufWriter<File>> {
    /// Create (or truncate) a run file
    pub fn create(path: &Path, run_tag: impl Into<String>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), run_tag))
    }
}

impl<W: Write> RunWriter<W> {
    /// Wrap a sink
    pub fn new(out: W, run_tag: impl Into<String>) -> Self {
        RunWriter {
            out,
            run_tag: run_tag.into(),
        }
    }

    /// Write every row of one topic and flush
    ///
    /// Returns the number of rows written.
    pub fn write_topic(&mut self, list: &RankedList) -> Result<usize> {
        for entry in &list.entries {
            writeln!(self.out, "{}", format_row(&list.topic, entry, &self.run_tag))?;
        }
        self.out.flush()?;
        Ok(list.len())
    }

    /// Unwrap the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
