//! The frequency-of-alternation engine.
//!
//! One invocation is a linear pipeline over a read-only corpus:
//! partition by segment presence, enumerate and filter the cross product,
//! aggregate the statistic, and optionally write the report. Cancellation and
//! progress are cooperative and polled at bounded intervals; when neither is
//! requested the scoring loop runs on rayon with enumeration order restored.

use ahash::AHashSet;
use rayon::prelude::*;
use tracing::debug;

use crate::align::Aligner;
use crate::corpus::{Corpus, Word};
use crate::error::{EngineError, Result};
use crate::report;
use crate::scorer::RelatednessScorer;
use crate::types::{
    AlternationPair, AlternationReport, AlternationSummary, EngineConfig, EngineOutcome,
};

/// Pair comparisons between cancellation checks and progress notifications
/// during enumeration. Partitioning polls per corpus item.
pub const PROGRESS_INTERVAL: usize = 1000;

/// A progress notification.
#[derive(Debug, Clone, Copy)]
pub enum Progress {
    /// A pipeline stage started.
    Stage {
        /// Human-readable stage label.
        label: &'static str,
        /// Total units the stage will process.
        total: usize,
    },
    /// Units processed so far within the current stage.
    Advance {
        /// Current unit count.
        done: usize,
    },
}

/// Cooperative cancellation and progress reporting for one invocation.
///
/// Both hooks are optional; the default context is passive and adds no
/// overhead beyond a null check.
#[derive(Default)]
pub struct RunContext<'a> {
    cancel: Option<&'a (dyn Fn() -> bool + Sync)>,
    progress: Option<&'a (dyn Fn(Progress) + Sync)>,
}

impl<'a> RunContext<'a> {
    /// A passive context: no cancellation, no progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll this predicate at each check interval; `true` stops the run.
    pub fn with_cancellation(mut self, check: &'a (dyn Fn() -> bool + Sync)) -> Self {
        self.cancel = Some(check);
        self
    }

    /// Receive stage and unit-count notifications.
    pub fn with_progress(mut self, callback: &'a (dyn Fn(Progress) + Sync)) -> Self {
        self.progress = Some(callback);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.map_or(false, |check| check())
    }

    fn stage(&self, label: &'static str, total: usize) {
        if let Some(callback) = self.progress {
            callback(Progress::Stage { label, total });
        }
    }

    fn advance(&self, done: usize) {
        if let Some(callback) = self.progress {
            callback(Progress::Advance { done });
        }
    }

    fn is_passive(&self) -> bool {
        self.cancel.is_none() && self.progress.is_none()
    }
}

/// Both partition lists (as corpus indices) plus the denominator set.
struct Partition {
    first: Vec<usize>,
    second: Vec<usize>,
    all_spellings: AHashSet<String>,
}

/// Computes frequency-of-alternation statistics over one corpus.
pub struct AlternationEngine<'a> {
    corpus: &'a Corpus,
    config: EngineConfig,
}

impl<'a> AlternationEngine<'a> {
    /// Create an engine over a read-only corpus.
    pub fn new(corpus: &'a Corpus, config: EngineConfig) -> Self {
        Self { corpus, config }
    }

    /// Run the pipeline with a passive context.
    pub fn run(&self, s1: &str, s2: &str) -> Result<EngineOutcome> {
        self.run_with(s1, s2, &RunContext::new())
    }

    /// Run the pipeline with cooperative cancellation and progress reporting.
    ///
    /// Returns `EngineOutcome::Cancelled` (with no report file written) if
    /// the cancellation check fires at any stage.
    pub fn run_with(&self, s1: &str, s2: &str, ctx: &RunContext<'_>) -> Result<EngineOutcome> {
        self.validate(s1, s2)?;

        let partition = match self.partition(s1, s2, ctx)? {
            Some(partition) => partition,
            None => return Ok(EngineOutcome::Cancelled),
        };
        debug!(
            first = partition.first.len(),
            second = partition.second.len(),
            denominator = partition.all_spellings.len(),
            "corpus partitioned"
        );

        if partition.all_spellings.is_empty() {
            return Err(EngineError::DivisionUndefined);
        }

        let scorer = self
            .config
            .relator
            .build(self.corpus, self.config.representation, self.config.count_mode)
            .map_err(|source| EngineError::Collaborator {
                stage: "building relatedness scorer".into(),
                source,
            })?;

        let pairs = match self.enumerate(&partition, scorer.as_ref(), s1, s2, ctx)? {
            Some(pairs) => pairs,
            None => return Ok(EngineOutcome::Cancelled),
        };
        debug!(survivors = pairs.len(), "candidate pairs filtered");

        ctx.stage("aggregating results", pairs.len());
        if ctx.cancelled() {
            return Ok(EngineOutcome::Cancelled);
        }

        let mut words_with_alt: AHashSet<&str> = AHashSet::new();
        for pair in &pairs {
            words_with_alt.insert(pair.first.as_str());
            words_with_alt.insert(pair.second.as_str());
        }

        let summary = AlternationSummary {
            total_words: partition.all_spellings.len(),
            alternating_words: words_with_alt.len(),
            frequency: words_with_alt.len() as f64 / partition.all_spellings.len() as f64,
        };
        let report = AlternationReport {
            segments: (s1.to_string(), s2.to_string()),
            first_count: partition.first.len(),
            second_count: partition.second.len(),
            pairs,
            summary,
        };

        if let Some(path) = &self.config.output_path {
            report::write_report(path, &report)?;
        }

        Ok(EngineOutcome::Completed(report))
    }

    fn validate(&self, s1: &str, s2: &str) -> Result<()> {
        if s1.is_empty() || s2.is_empty() {
            return Err(EngineError::Config("segments must be non-empty".into()));
        }
        if let (Some(min), Some(max)) = (self.config.min_relatedness, self.config.max_relatedness) {
            if min > max {
                return Err(EngineError::Config(format!(
                    "min relatedness {min} exceeds max relatedness {max}"
                )));
            }
        }
        if self.config.phono_align && self.corpus.specifier().is_empty() {
            return Err(EngineError::Config(
                "phonological alignment requires a feature specification".into(),
            ));
        }
        Ok(())
    }

    /// Classify each word by segment presence; `None` means cancelled.
    ///
    /// A word containing both segments lands in both lists. The denominator
    /// set collects distinct spellings, so two entries sharing a spelling
    /// count once.
    fn partition(&self, s1: &str, s2: &str, ctx: &RunContext<'_>) -> Result<Option<Partition>> {
        ctx.stage("partitioning corpus", self.corpus.len());

        let mut first = Vec::new();
        let mut second = Vec::new();
        let mut all_spellings = AHashSet::new();

        for (idx, word) in self.corpus.iter().enumerate() {
            if ctx.cancelled() {
                return Ok(None);
            }
            ctx.advance(idx);

            let form = word.form(self.config.representation);
            let has_s1 = form.contains(s1);
            let has_s2 = form.contains(s2);
            if has_s1 {
                first.push(idx);
            }
            if has_s2 {
                second.push(idx);
            }
            if has_s1 || has_s2 {
                all_spellings.insert(word.spelling.clone());
            }
        }

        Ok(Some(Partition {
            first,
            second,
            all_spellings,
        }))
    }

    /// Enumerate the cross product and apply all pair filters; `None` means
    /// cancelled. Surviving pairs keep enumeration order.
    fn enumerate(
        &self,
        partition: &Partition,
        scorer: &dyn RelatednessScorer,
        s1: &str,
        s2: &str,
        ctx: &RunContext<'_>,
    ) -> Result<Option<Vec<AlternationPair>>> {
        let total = partition.first.len() * partition.second.len();
        ctx.stage("scoring candidate pairs", total);

        let aligner = self
            .config
            .phono_align
            .then(|| Aligner::new(self.corpus.specifier()));
        let words = self.corpus.words();

        if ctx.is_passive() {
            let candidates: Vec<(usize, usize)> = partition
                .first
                .iter()
                .flat_map(|&i| partition.second.iter().map(move |&j| (i, j)))
                .filter(|(i, j)| i != j)
                .collect();

            let survivors: Vec<Option<AlternationPair>> = candidates
                .par_iter()
                .map(|&(i, j)| {
                    self.evaluate_pair(scorer, aligner.as_ref(), &words[i], &words[j], s1, s2)
                })
                .collect::<Result<_>>()?;

            return Ok(Some(survivors.into_iter().flatten().collect()));
        }

        let mut pairs = Vec::new();
        let mut seen = 0usize;
        for &i in &partition.first {
            for &j in &partition.second {
                if seen % PROGRESS_INTERVAL == 0 {
                    if ctx.cancelled() {
                        return Ok(None);
                    }
                    ctx.advance(seen);
                }
                seen += 1;

                // Entity identity, not spelling equality
                if i == j {
                    continue;
                }
                if let Some(pair) =
                    self.evaluate_pair(scorer, aligner.as_ref(), &words[i], &words[j], s1, s2)?
                {
                    pairs.push(pair);
                }
            }
        }

        Ok(Some(pairs))
    }

    /// Score one pair and apply the bound, minimal-pair, and alignment
    /// filters. Filter decisions never raise; only scorer failures do.
    fn evaluate_pair(
        &self,
        scorer: &dyn RelatednessScorer,
        aligner: Option<&Aligner<'_>>,
        w1: &Word,
        w2: &Word,
        s1: &str,
        s2: &str,
    ) -> Result<Option<AlternationPair>> {
        let scored = scorer
            .score(w1, w2)
            .map_err(|source| EngineError::Collaborator {
                stage: format!("scoring pair ({}, {})", w1.spelling, w2.spelling),
                source,
            })?;

        if let Some(min) = self.config.min_relatedness {
            if scored.score < min {
                return Ok(None);
            }
        }
        if let Some(max) = self.config.max_relatedness {
            if scored.score > max {
                return Ok(None);
            }
        }

        if !self.config.allow_minimal_pairs {
            let a = w1.segments(self.config.minimal_pair_representation);
            let b = w2.segments(self.config.minimal_pair_representation);
            if is_minimal_pair(&a, &b) {
                return Ok(None);
            }
        }

        if let Some(aligner) = aligner {
            let alignment = aligner.align(&w1.transcription, &w2.transcription);
            if !aligner.is_related(&alignment, s1, s2) {
                return Ok(None);
            }
        }

        Ok(Some(AlternationPair::new(
            w1.spelling.clone(),
            w2.spelling.clone(),
            scored.score,
        )))
    }
}

/// Equal-length forms differing in exactly one position.
///
/// Forms of unequal length are never minimal pairs.
fn is_minimal_pair(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diffs = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    diffs == 1
}

/// Single entry point: compute the frequency of alternation of two segments.
pub fn frequency_of_alternation(
    corpus: &Corpus,
    s1: &str,
    s2: &str,
    config: EngineConfig,
) -> Result<EngineOutcome> {
    AlternationEngine::new(corpus, config).run(s1, s2)
}
