//! Shared data structures for frequency-of-alternation analysis.

use std::path::PathBuf;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::corpus::Representation;

/// Relatedness scorer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatorType {
    /// Normalized grapheme/segment edit-distance similarity.
    EditDistance,
    /// Khorsi-style log-odds similarity driven by corpus segment frequencies.
    Khorsi,
    /// Longest-common-subsequence ratio.
    LcsRatio,
}

/// Whether frequency-sensitive scorers weight by corpus token counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountMode {
    /// Each word counts once.
    Type,
    /// Each word is weighted by its token frequency.
    Token,
}

/// Options for one engine invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which relatedness scorer to use.
    pub relator: RelatorType,
    /// Type vs token counting for frequency-sensitive scorers.
    pub count_mode: CountMode,
    /// Representation used for partitioning and scoring.
    pub representation: Representation,
    /// Discard pairs scoring below this bound.
    pub min_relatedness: Option<f64>,
    /// Discard pairs scoring above this bound.
    pub max_relatedness: Option<f64>,
    /// Require phonological-alignment evidence for each surviving pair.
    pub phono_align: bool,
    /// Keep minimal pairs instead of discarding them.
    pub allow_minimal_pairs: bool,
    /// Representation the minimal-pair filter compares.
    ///
    /// The filter historically compared transcriptions even when scoring ran
    /// over spellings; the default preserves that, but it is configurable.
    pub minimal_pair_representation: Representation,
    /// Write a tab-delimited report here on completion.
    pub output_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            relator: RelatorType::EditDistance,
            count_mode: CountMode::Type,
            representation: Representation::Transcription,
            min_relatedness: None,
            max_relatedness: None,
            phono_align: false,
            allow_minimal_pairs: false,
            minimal_pair_representation: Representation::Transcription,
            output_path: None,
        }
    }
}

/// One surviving candidate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternationPair {
    /// Spelling of the word drawn from the first segment's list.
    pub first: String,
    /// Spelling of the word drawn from the second segment's list.
    pub second: String,
    /// Relatedness score for the pair.
    pub score: OrderedFloat<f64>,
}

impl AlternationPair {
    /// Build a pair row.
    pub fn new(first: String, second: String, score: f64) -> Self {
        Self {
            first,
            second,
            score: OrderedFloat(score),
        }
    }
}

/// The canonical summary triple returned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternationSummary {
    /// Distinct spellings containing either segment.
    pub total_words: usize,
    /// Distinct spellings appearing in at least one surviving pair.
    pub alternating_words: usize,
    /// `alternating_words / total_words`.
    pub frequency: f64,
}

/// Full result of a completed invocation, as exposed to the report sink.
#[derive(Debug, Clone, Serialize)]
pub struct AlternationReport {
    /// The two segments analyzed, in invocation order.
    pub segments: (String, String),
    /// Words whose representation contains the first segment.
    pub first_count: usize,
    /// Words whose representation contains the second segment.
    pub second_count: usize,
    /// Surviving pairs in enumeration order.
    pub pairs: Vec<AlternationPair>,
    /// The summary triple.
    pub summary: AlternationSummary,
}

impl AlternationReport {
    /// Serialize the report to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone)]
pub enum EngineOutcome {
    /// The pipeline ran to completion.
    Completed(AlternationReport),
    /// The cancellation check fired before completion; no report was written.
    Cancelled,
}

impl EngineOutcome {
    /// The summary triple, if the run completed.
    pub fn summary(&self) -> Option<AlternationSummary> {
        match self {
            EngineOutcome::Completed(report) => Some(report.summary),
            EngineOutcome::Cancelled => None,
        }
    }
}

/// Edit operation in sequence alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Identical segments aligned.
    Match,
    /// Distinct segments aligned.
    Substitute,
    /// Segment present only in the second form.
    Insert,
    /// Segment present only in the first form.
    Delete,
}

/// Result of phonological alignment.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// First form with gap markers.
    pub sequence_a: Vec<String>,
    /// Second form with gap markers.
    pub sequence_b: Vec<String>,
    /// Column-wise operations.
    pub operations: Vec<EditOp>,
    /// Total alignment cost.
    pub cost: f64,
}

impl Alignment {
    /// Build an alignment from parallel gapped sequences.
    pub fn new(
        sequence_a: Vec<String>,
        sequence_b: Vec<String>,
        operations: Vec<EditOp>,
        cost: f64,
    ) -> Self {
        Self {
            sequence_a,
            sequence_b,
            operations,
            cost,
        }
    }

    /// Segment correspondences from substitution columns.
    pub fn correspondences(&self) -> Vec<(String, String)> {
        let mut rules = Vec::new();
        for (i, op) in self.operations.iter().enumerate() {
            if *op == EditOp::Substitute {
                rules.push((self.sequence_a[i].clone(), self.sequence_b[i].clone()));
            }
        }
        rules
    }
}
