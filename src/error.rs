//! Error types for frequency-of-alternation analysis.

use thiserror::Error;

use crate::scorer::ScorerError;

/// Errors that can occur while computing a frequency-of-alternation statistic.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A parameter was invalid before any corpus work started.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No word in the corpus contains either segment, so the statistic
    /// has an empty denominator.
    #[error("frequency of alternation is undefined: no word contains either segment")]
    DivisionUndefined,

    /// The relatedness scorer failed.
    ///
    /// A partial statistic is worse than no statistic, so the whole
    /// computation aborts on the first scorer failure.
    #[error("{stage}: {source}")]
    Collaborator {
        /// What the engine was doing when the scorer failed, e.g. which
        /// pair was being scored.
        stage: String,
        /// The underlying scorer failure.
        source: ScorerError,
    },

    /// Writing the report file failed.
    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
