//! Default values for run generation
//!
//! These are the values used by the NTCIR-11 Math run when nothing else is
//! configured. Every one of them can be overridden through `RunConfig`.

/// Maximum number of ranked entries written per topic.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Number of entries padding tops a topic up to.
pub const DEFAULT_PADDING_TARGET: usize = 1000;

/// Additive score bonus for hits retrieved by a formula-bearing variant.
pub const DEFAULT_FORMULA_BOOST: f64 = 5.0;

/// Pagination offset sent with every backend request.
pub const DEFAULT_PAGE_FROM: usize = 0;

/// Page size sent with every backend request.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Search backend endpoint.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8889/";

/// Run tag written in the last column of every run-file line.
pub const DEFAULT_RUN_TAG: &str = "KWARC_default";

/// Topic XML location.
pub const DEFAULT_TOPICS_PATH: &str = "./queries.xml";

/// Run-file location.
pub const DEFAULT_OUTPUT_PATH: &str = "./KWARC.txt";

/// Filler pool location.
pub const DEFAULT_FILLER_PATH: &str = "./random_hits.txt";
