//! Run pipeline driver
//!
//! Topics are processed one at a time, in input order. For each topic every
//! query variant is issued and registered with the aggregator; only once all
//! of them are in does the topic get padded, ranked and streamed to the run
//! file. The first failing variant halts the run.
//!
//! Variants of one topic may be issued on a worker pool. Registration is a
//! max-merge, so the order in which variants land does not change the result.

use crate::config::RunConfig;
use crate::writer::RunWriter;
use mathrun_backend::SearchBackend;
use mathrun_core::{Error, QueryVariant, RankedList, Result, Topic, TopicId};
use mathrun_search::{ResultAggregator, ResultProcessor};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::Write;

/// Outcome counters of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Topics read from the input
    pub topics_seen: usize,
    /// Topics with at least one row in the run file
    pub topics_written: usize,
    /// Topics dropped for retrieving nothing
    pub topics_dropped: usize,
    /// Rows in the run file
    pub rows_written: usize,
    /// Written topics whose padding ran out of filler
    pub topics_short: usize,
}

/// Drives topics through backend, aggregator, processor and writer
pub struct RunPipeline<B: SearchBackend> {
    backend: B,
    aggregator: ResultAggregator,
    processor: ResultProcessor,
    pool: Option<ThreadPool>,
}

impl<B: SearchBackend> RunPipeline<B> {
    /// Create a sequential pipeline
    pub fn new(backend: B, aggregator: ResultAggregator, processor: ResultProcessor) -> Self {
        RunPipeline {
            backend,
            aggregator,
            processor,
            pool: None,
        }
    }

    /// Assemble a pipeline from configuration around a backend
    pub fn from_config(config: &RunConfig, backend: B) -> Result<Self> {
        config.validate()?;
        let processor = config.build_processor()?;
        Self::new(backend, config.build_aggregator(), processor)
            .with_variant_threads(config.concurrency.variant_threads)
    }

    /// Issue each topic's variants on `threads` workers
    ///
    /// One thread keeps the pipeline fully sequential.
    pub fn with_variant_threads(mut self, threads: usize) -> Result<Self> {
        self.pool = if threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("mathrun-variant-{}", i))
                .build()
                .map_err(|e| Error::config(format!("Failed to start variant workers: {}", e)))?;
            Some(pool)
        } else {
            None
        };
        Ok(self)
    }

    /// Search backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Aggregation context
    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    /// Issue one variant and register its response
    fn issue_variant(&self, topic: &TopicId, index: usize, variant: &QueryVariant) -> Result<usize> {
        let body = self
            .backend
            .query(variant)
            .map_err(|e| Error::backend(topic, index, e))?;
        let hits = self
            .aggregator
            .register_result(topic, &body, variant.has_formula())
            .map_err(|e| Error::malformed_response(topic, index, e))?;

        tracing::info!(
            target: "mathrun::pipeline",
            topic = %topic,
            variant = index,
            hits,
            "Registered result"
        );
        Ok(hits)
    }

    /// Issue and register every variant of a topic
    pub fn collect_topic(&self, topic: &Topic) -> Result<()> {
        let issue = |(index, variant): (usize, &QueryVariant)| {
            self.issue_variant(&topic.id, index, variant).map(|_| ())
        };

        let outcome = match &self.pool {
            Some(pool) => pool.install(|| topic.variants.par_iter().enumerate().try_for_each(issue)),
            None => topic.variants.iter().enumerate().try_for_each(issue),
        };

        if outcome.is_err() {
            self.aggregator.take(&topic.id);
        }
        outcome
    }

    /// Collect, pad and rank one topic
    ///
    /// Returns `None` for a topic that retrieved nothing.
    pub fn process_topic(&self, topic: &Topic) -> Result<Option<RankedList>> {
        self.collect_topic(topic)?;
        Ok(self.processor.process_results(&self.aggregator, &topic.id))
    }

    /// Process every topic and stream the rankings to `writer`
    ///
    /// # Errors
    ///
    /// Stops at the first backend or decoding failure. Topics written before
    /// it remain in the writer's sink.
    pub fn run<W: Write>(&self, topics: &[Topic], writer: &mut RunWriter<W>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for topic in topics {
            summary.topics_seen += 1;
            match self.process_topic(topic)? {
                Some(list) => {
                    summary.rows_written += writer.write_topic(&list)?;
                    summary.topics_written += 1;
                    if list.padding_exhausted {
                        summary.topics_short += 1;
                    }
                }
                None => summary.topics_dropped += 1,
            }
        }

        tracing::info!(
            target: "mathrun::pipeline",
            topics = summary.topics_seen,
            written = summary.topics_written,
            dropped = summary.topics_dropped,
            short = summary.topics_short,
            rows = summary.rows_written,
            "Run complete"
        );
        Ok(summary)
    }
}

/// Run a whole configuration against the HTTP backend
///
/// Reads the topics, creates the run file and processes every topic.
pub fn execute(config: &RunConfig) -> Result<RunSummary> {
    let topics = config.load_topics()?;
    let pipeline = RunPipeline::from_config(config, config.build_backend())?;
    let mut writer = RunWriter::create(&config.output, config.run_tag.clone())?;

    tracing::info!(
        target: "mathrun::pipeline",
        profile = %config.profile,
        topics = topics.len(),
        backend = %config.backend.url,
        output = %config.output.display(),
        "Starting run"
    );
    pipeline.run(topics.topics(), &mut writer)
}
