//! mathrun - evaluation-run generator for a text+math search backend
//!
//! For every topic of an NTCIR topic file, mathrun queries the search
//! backend once per query variant, max-merges the hits (boosting hits of
//! formula-bearing variants), pads short result sets from a filler pool,
//! ranks, truncates and writes a tab-separated run file.
//!
//! # Quick Start
//!
//! ```ignore
//! use mathrun::{execute, RunConfig};
//!
//! let config = RunConfig::from_file(Path::new("mathrun.toml"))?;
//! let summary = execute(&config)?;
//! ```

pub mod cli;

pub use mathrun_backend::{BackendError, HttpBackend, SearchBackend};
pub use mathrun_core::{
    Error, Hit, HitOrigin, QueryVariant, RankedEntry, RankedList, Result, Topic, TopicId,
};
pub use mathrun_engine::{
    execute, Profile, RunConfig, RunPipeline, RunSummary, RunWriter, CONFIG_FILE_NAME,
};
pub use mathrun_search::{
    FillerPool, Padder, Ranker, ResponseDecoder, ResponseFormat, ResponseShape,
    ResultAggregator, ResultProcessor,
};
pub use mathrun_topics::{TopicSource, VariantPolicy};
