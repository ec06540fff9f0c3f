//! Pluggable relatedness scorers for candidate word pairs.
//!
//! A scorer turns a pair of word forms into a single relatedness score. The
//! engine treats scores as opaque comparable values; bounds filtering only
//! makes sense relative to the relator that produced them.

use ahash::AHashMap;
use rayon::prelude::*;
use thiserror::Error;

use crate::corpus::{Corpus, Representation, Word};
use crate::types::{CountMode, RelatorType};

/// Errors raised by relatedness scorers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScorerError {
    /// Frequency-sensitive scorers cannot be built over a corpus with no
    /// segments in the chosen representation.
    #[error("cannot estimate segment frequencies from an empty corpus")]
    EmptyFrequencyTable,
}

/// The scored form pair produced for one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPair {
    /// Flattened form of the first word.
    pub first: String,
    /// Flattened form of the second word.
    pub second: String,
    /// Relatedness score.
    pub score: f64,
}

/// A relatedness scorer over word pairs.
pub trait RelatednessScorer: Send + Sync {
    /// Score a single pair.
    fn score(&self, first: &Word, second: &Word) -> Result<ScoredPair, ScorerError>;

    /// Score a batch of pairs in parallel, preserving input order.
    fn score_batch(&self, pairs: &[(&Word, &Word)]) -> Result<Vec<ScoredPair>, ScorerError> {
        pairs
            .par_iter()
            .map(|(first, second)| self.score(first, second))
            .collect()
    }
}

impl RelatorType {
    /// Build the scorer this relator names, precomputing any corpus-wide
    /// statistics it needs.
    pub fn build(
        self,
        corpus: &Corpus,
        representation: Representation,
        count_mode: CountMode,
    ) -> Result<Box<dyn RelatednessScorer>, ScorerError> {
        match self {
            RelatorType::EditDistance => Ok(Box::new(EditDistanceScorer { representation })),
            RelatorType::LcsRatio => Ok(Box::new(LcsRatioScorer { representation })),
            RelatorType::Khorsi => {
                let frequencies =
                    SegmentFrequencies::from_corpus(corpus, representation, count_mode)?;
                Ok(Box::new(KhorsiScorer {
                    representation,
                    frequencies,
                }))
            }
        }
    }
}

/// Normalized segment edit-distance similarity in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct EditDistanceScorer {
    representation: Representation,
}

impl RelatednessScorer for EditDistanceScorer {
    fn score(&self, first: &Word, second: &Word) -> Result<ScoredPair, ScorerError> {
        let a = first.segments(self.representation);
        let b = second.segments(self.representation);

        let max_len = a.len().max(b.len());
        let score = if max_len == 0 {
            1.0 // Both empty = perfect match
        } else {
            1.0 - levenshtein(&a, &b) as f64 / max_len as f64
        };

        Ok(ScoredPair {
            first: a.concat(),
            second: b.concat(),
            score,
        })
    }
}

/// Longest-common-subsequence ratio in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct LcsRatioScorer {
    representation: Representation,
}

impl RelatednessScorer for LcsRatioScorer {
    fn score(&self, first: &Word, second: &Word) -> Result<ScoredPair, ScorerError> {
        let a = first.segments(self.representation);
        let b = second.segments(self.representation);

        let max_len = a.len().max(b.len());
        let score = if max_len == 0 {
            1.0
        } else {
            let (matched, _) = lcs_split(&a, &b);
            matched.len() as f64 / max_len as f64
        };

        Ok(ScoredPair {
            first: a.concat(),
            second: b.concat(),
            score,
        })
    }
}

/// Khorsi-style log-odds similarity.
///
/// Segments shared between the two forms contribute their information content
/// (rare segments count for more); segments unique to one form subtract
/// theirs. Scores are unbounded and can be negative.
#[derive(Debug, Clone)]
pub struct KhorsiScorer {
    representation: Representation,
    frequencies: SegmentFrequencies,
}

impl RelatednessScorer for KhorsiScorer {
    fn score(&self, first: &Word, second: &Word) -> Result<ScoredPair, ScorerError> {
        let a = first.segments(self.representation);
        let b = second.segments(self.representation);

        let (matched, unmatched) = lcs_split(&a, &b);
        let score = matched
            .iter()
            .map(|seg| self.frequencies.information(seg))
            .sum::<f64>()
            - unmatched
                .iter()
                .map(|seg| self.frequencies.information(seg))
                .sum::<f64>();

        Ok(ScoredPair {
            first: a.concat(),
            second: b.concat(),
            score,
        })
    }
}

/// Corpus-wide segment probabilities, as information content (-ln p).
#[derive(Debug, Clone)]
struct SegmentFrequencies {
    information: AHashMap<String, f64>,
    /// Information assigned to segments never seen in the corpus.
    floor: f64,
}

impl SegmentFrequencies {
    fn from_corpus(
        corpus: &Corpus,
        representation: Representation,
        count_mode: CountMode,
    ) -> Result<Self, ScorerError> {
        let mut counts: AHashMap<String, f64> = AHashMap::new();
        let mut total = 0.0;

        for word in corpus.iter() {
            let weight = match count_mode {
                CountMode::Type => 1.0,
                CountMode::Token => word.frequency.max(0.0),
            };
            if weight == 0.0 {
                continue;
            }
            for segment in word.segments(representation) {
                *counts.entry(segment).or_insert(0.0) += weight;
                total += weight;
            }
        }

        if total <= 0.0 {
            return Err(ScorerError::EmptyFrequencyTable);
        }

        let information = counts
            .into_iter()
            .map(|(segment, count)| (segment, -(count / total).ln()))
            .collect();

        Ok(Self {
            information,
            floor: -(1.0 / (total + 1.0)).ln(),
        })
    }

    fn information(&self, segment: &str) -> f64 {
        self.information.get(segment).copied().unwrap_or(self.floor)
    }
}

/// Standard Levenshtein distance using dynamic programming.
fn levenshtein(a: &[String], b: &[String]) -> usize {
    let len_a = a.len();
    let len_b = b.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row = vec![0; len_b + 1];

    for (i, seg_a) in a.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, seg_b) in b.iter().enumerate() {
            let cost = if seg_a == seg_b { 0 } else { 1 };

            curr_row[j + 1] = std::cmp::min(
                std::cmp::min(curr_row[j] + 1, prev_row[j + 1] + 1),
                prev_row[j] + cost,
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// Split two segment sequences into the longest common subsequence and the
/// leftover segments of both.
fn lcs_split(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let len_a = a.len();
    let len_b = b.len();

    let mut dp = vec![vec![0usize; len_b + 1]; len_a + 1];
    for i in 1..=len_a {
        for j in 1..=len_b {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    let mut i = len_a;
    let mut j = len_b;
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] && dp[i][j] == dp[i - 1][j - 1] + 1 {
            matched.push(a[i - 1].clone());
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] >= dp[i][j - 1] {
            unmatched.push(a[i - 1].clone());
            i -= 1;
        } else {
            unmatched.push(b[j - 1].clone());
            j -= 1;
        }
    }
    unmatched.extend(a[..i].iter().cloned());
    unmatched.extend(b[..j].iter().cloned());
    matched.reverse();

    (matched, unmatched)
}
