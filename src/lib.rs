//! freqalt: frequency-of-alternation analysis for corpus phonology.
//!
//! Computes how often two segments (e.g. s and ʃ) alternate across a corpus:
//! the proportion of words containing either segment that participate in a
//! plausible alternation pair with a word containing the other. Candidate
//! pairs are scored with a pluggable relatedness scorer, filtered by score
//! bounds, minimal-pair exclusion, and optional feature-based phonological
//! alignment, then aggregated into the summary statistic.
//!
//! ```
//! use freqalt::{frequency_of_alternation, Corpus, EngineConfig, EngineOutcome, Word};
//!
//! let corpus = Corpus::new(vec![
//!     Word::new("dish", &["d", "ɪ", "ʃ"]),
//!     Word::new("diss", &["d", "ɪ", "s"]),
//!     Word::new("cat", &["k", "æ", "t"]),
//! ]);
//!
//! let config = EngineConfig {
//!     allow_minimal_pairs: true,
//!     ..EngineConfig::default()
//! };
//! let outcome = frequency_of_alternation(&corpus, "s", "ʃ", config).unwrap();
//! if let EngineOutcome::Completed(report) = outcome {
//!     assert_eq!(report.summary.frequency, 1.0);
//! }
//! ```

pub mod align;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod report;
pub mod scorer;
pub mod types;

pub use align::Aligner;
pub use corpus::{Corpus, FeatureMatrix, Representation, Word};
pub use engine::{
    frequency_of_alternation, AlternationEngine, Progress, RunContext, PROGRESS_INTERVAL,
};
pub use error::{EngineError, Result};
pub use scorer::{RelatednessScorer, ScoredPair, ScorerError};
pub use types::{
    Alignment, AlternationPair, AlternationReport, AlternationSummary, CountMode, EditOp,
    EngineConfig, EngineOutcome, RelatorType,
};
