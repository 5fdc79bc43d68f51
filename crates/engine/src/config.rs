//! Run configuration via `mathrun.toml`
//!
//! Every setting is static and enumerated here. A profile selects the
//! defaults of the NTCIR-11 task being run; each value the profile decides
//! can still be set explicitly in the file or overridden from the command line.

use mathrun_backend::HttpBackend;
use mathrun_core::defaults::{
    DEFAULT_BACKEND_URL, DEFAULT_FILLER_PATH, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_PATH,
    DEFAULT_PADDING_TARGET, DEFAULT_PAGE_FROM, DEFAULT_PAGE_SIZE, DEFAULT_RUN_TAG,
    DEFAULT_TOPICS_PATH,
};
use mathrun_core::{Error, Result};
use mathrun_search::{
    FillerPool, Padder, Ranker, ResponseDecoder, ResponseFormat, ResultAggregator,
    ResultProcessor,
};
use mathrun_topics::{TopicSource, VariantPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "mathrun.toml";

// ============================================================================
// Profile
// ============================================================================

/// Which NTCIR-11 task a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Math task: keywords plus formulas, boosted, padded to 1000
    #[default]
    Ntcir,
    /// Wikipedia task: formulas only, unboosted, unpadded
    Wiki,
}

impl Profile {
    /// How topics expand into variants
    pub fn variant_policy(self) -> VariantPolicy {
        match self {
            Profile::Ntcir => VariantPolicy::ntcir(),
            Profile::Wiki => VariantPolicy::wiki(),
        }
    }

    /// Default boost for hits of formula-bearing variants
    pub fn formula_boost(self) -> f64 {
        match self {
            Profile::Ntcir => 5.0,
            Profile::Wiki => 0.0,
        }
    }

    /// Whether padding is on by default
    pub fn padding_enabled(self) -> bool {
        matches!(self, Profile::Ntcir)
    }

    /// Name as written in the config file
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Ntcir => "ntcir",
            Profile::Wiki => "wiki",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ntcir" => Ok(Profile::Ntcir),
            "wiki" => Ok(Profile::Wiki),
            other => Err(Error::config(format!(
                "Invalid profile '{}'. Expected \"ntcir\" or \"wiki\".",
                other
            ))),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// `[backend]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Search daemon endpoint
    pub url: String,
    /// Pagination offset sent with every request
    pub from: usize,
    /// Page size sent with every request
    pub size: usize,
    /// Per-request timeout in milliseconds; unset waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Accepted response shape; unset accepts both flat and nested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            from: DEFAULT_PAGE_FROM,
            size: DEFAULT_PAGE_SIZE,
            timeout_ms: None,
            response_format: None,
        }
    }
}

/// `[scoring]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Additive boost for formula-bearing variants; unset follows the profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_boost: Option<f64>,
    /// Maximum rows written per topic
    pub max_depth: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            formula_boost: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// `[padding]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaddingConfig {
    /// Pad under-filled topics; unset follows the profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Entry count padding aims for
    pub target: usize,
    /// Newline-delimited filler id list
    pub filler_path: PathBuf,
    /// Seed for per-topic shuffles; unset draws from OS entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            target: DEFAULT_PADDING_TARGET,
            filler_path: PathBuf::from(DEFAULT_FILLER_PATH),
            seed: None,
        }
    }
}

/// `[concurrency]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Worker threads issuing one topic's variants; 1 is fully sequential
    pub variant_threads: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { variant_threads: 1 }
    }
}

// ============================================================================
// RunConfig
// ============================================================================

/// Run configuration loaded from `mathrun.toml`.
///
/// # Example
///
/// ```toml
/// profile = "wiki"
/// topics = "./wiki-queries.xml"
/// run_tag = "KWARC_wiki"
///
/// [backend]
/// url = "http://localhost:8890/"
/// timeout_ms = 30000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Task profile: `"ntcir"` or `"wiki"`.
    #[serde(default)]
    pub profile: Profile,
    /// Topic XML file.
    #[serde(default = "default_topics")]
    pub topics: PathBuf,
    /// Run file to write.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Tag written in the last column of every row.
    #[serde(default = "default_run_tag")]
    pub run_tag: String,
    /// Search backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Boost and depth.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Filler padding.
    #[serde(default)]
    pub padding: PaddingConfig,
    /// Variant parallelism.
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
}

fn default_topics() -> PathBuf {
    PathBuf::from(DEFAULT_TOPICS_PATH)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_run_tag() -> String {
    DEFAULT_RUN_TAG.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            topics: default_topics(),
            output: default_output(),
            run_tag: default_run_tag(),
            backend: BackendConfig::default(),
            scoring: ScoringConfig::default(),
            padding: PaddingConfig::default(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}

impl RunConfig {
    /// Default config for a profile
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# mathrun configuration
#
# Profile: "ntcir" (default) or "wiki"
#   "ntcir" = NTCIR-11 Math: keywords + formulas, boost 5, padding to 1000
#   "wiki"  = NTCIR-11 Wikipedia: formulas only, no boost, no padding
profile = "ntcir"

topics = "./queries.xml"
output = "./KWARC.txt"
run_tag = "KWARC_default"

[backend]
url = "http://localhost:8889/"
from = 0
size = 100
# Per-request timeout in milliseconds (default: wait forever)
# timeout_ms = 30000
# Response shape: "auto", "flat" or "nested" (default: auto)
# response_format = "auto"

[scoring]
# Added to every hit of a formula-bearing query (default: follows profile)
# formula_boost = 5.0
max_depth = 1000

[padding]
# Pad topics with filler ids up to `target` (default: follows profile)
# enabled = true
target = 1000
filler_path = "./random_hits.txt"
# Fixed seed makes every topic's filler order reproducible
# seed = 42

[concurrency]
# Threads issuing the queries of one topic (1 = sequential)
variant_threads = 1
"#
    }

    /// Parse and validate config text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML for this
    /// structure or holds invalid values.
    pub fn parse(content: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: RunConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| {
            Error::config(format!(
                "Failed to write default config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.run_tag.is_empty() {
            return Err(Error::config("run_tag must not be empty"));
        }
        if self.run_tag.contains(|c: char| matches!(c, '\t' | '\n' | '\r')) {
            return Err(Error::config(
                "run_tag must not contain tabs or line breaks",
            ));
        }
        if self.backend.size == 0 {
            return Err(Error::config("backend.size must be at least 1"));
        }
        if self.scoring.max_depth == 0 {
            return Err(Error::config("scoring.max_depth must be at least 1"));
        }
        if u32::try_from(self.scoring.max_depth).is_err() {
            return Err(Error::config(format!(
                "scoring.max_depth must not exceed {}",
                u32::MAX
            )));
        }
        if !self.formula_boost().is_finite() {
            return Err(Error::config("scoring.formula_boost must be finite"));
        }
        if self.padding_enabled() && self.padding.target == 0 {
            return Err(Error::config(
                "padding.target must be at least 1 when padding is enabled",
            ));
        }
        if self.concurrency.variant_threads == 0 {
            return Err(Error::config(
                "concurrency.variant_threads must be at least 1",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Resolved settings
    // ========================================================================

    /// Effective formula boost
    pub fn formula_boost(&self) -> f64 {
        self.scoring
            .formula_boost
            .unwrap_or_else(|| self.profile.formula_boost())
    }

    /// Whether padding runs
    pub fn padding_enabled(&self) -> bool {
        self.padding
            .enabled
            .unwrap_or_else(|| self.profile.padding_enabled())
    }

    /// Effective response shape
    pub fn response_format(&self) -> ResponseFormat {
        self.backend.response_format.unwrap_or_default()
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.backend.timeout_ms.map(Duration::from_millis)
    }

    // ========================================================================
    // Component construction
    // ========================================================================

    /// Aggregator with the effective boost and response shape
    pub fn build_aggregator(&self) -> ResultAggregator {
        ResultAggregator::new(
            self.formula_boost(),
            ResponseDecoder::for_format(self.response_format()),
        )
    }

    /// Padding and ranking stage; loads the filler pool when padding is on
    pub fn build_processor(&self) -> Result<ResultProcessor> {
        let processor = ResultProcessor::new(Ranker::new(self.scoring.max_depth));
        if !self.padding_enabled() {
            return Ok(processor);
        }

        let pool = FillerPool::load(&self.padding.filler_path).map_err(|e| {
            Error::config(format!(
                "Failed to load filler pool '{}': {}",
                self.padding.filler_path.display(),
                e
            ))
        })?;
        let padder = Padder::new(Arc::new(pool), self.padding.target).with_seed(self.padding.seed);
        Ok(processor.with_padder(padder))
    }

    /// HTTP client for the configured endpoint
    pub fn build_backend(&self) -> HttpBackend {
        HttpBackend::new(
            self.backend.url.clone(),
            self.backend.from,
            self.backend.size,
            self.timeout(),
        )
    }

    /// Read the topic file under the profile's variant policy
    pub fn load_topics(&self) -> Result<TopicSource> {
        TopicSource::load(&self.topics, self.profile.variant_policy())
    }
}
