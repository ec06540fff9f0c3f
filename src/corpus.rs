//! Corpus entities: words, segmented representations, and the feature specifier.

use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Which representation of a word an analysis operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Representation {
    /// Orthographic form, segmented into graphemes.
    Spelling,
    /// Phonological transcription, segmented into IPA symbols.
    Transcription,
}

/// A corpus entry with an orthographic form and a segmented transcription.
///
/// Two words with the same spelling are still distinct entries; identity is
/// positional within the corpus, not value equality.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Word {
    /// Orthographic form.
    pub spelling: String,
    /// Ordered transcription symbols.
    pub transcription: Vec<String>,
    /// Token frequency in the corpus (defaults to 1.0).
    pub frequency: f64,
}

impl Word {
    /// Create a word with unit token frequency.
    pub fn new(spelling: impl Into<String>, transcription: &[&str]) -> Self {
        Self {
            spelling: spelling.into(),
            transcription: transcription.iter().map(|s| s.to_string()).collect(),
            frequency: 1.0,
        }
    }

    /// Set the token frequency.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// The requested representation flattened into one symbol string.
    ///
    /// Segment membership tests are run against this form, so raw spellings
    /// and segmented transcriptions behave identically.
    pub fn form(&self, kind: Representation) -> String {
        match kind {
            Representation::Spelling => self.spelling.clone(),
            Representation::Transcription => self.transcription.concat(),
        }
    }

    /// The requested representation as an ordered segment sequence.
    pub fn segments(&self, kind: Representation) -> Vec<String> {
        match kind {
            Representation::Spelling => self
                .spelling
                .graphemes(true)
                .map(|g| g.to_string())
                .collect(),
            Representation::Transcription => self.transcription.clone(),
        }
    }
}

/// Segment-to-feature-values table used by the phonological aligner.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    rows: FxHashMap<String, Vec<i8>>,
}

impl FeatureMatrix {
    /// Create an empty feature matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the feature-value row for a segment symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, features: Vec<i8>) {
        self.rows.insert(symbol.into(), features);
    }

    /// Whether the matrix specifies features for a symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.rows.contains_key(symbol)
    }

    /// Number of segments specified.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix specifies no segments at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalized feature distance between two symbols in [0, 1].
    ///
    /// Symbols missing from the matrix are maximally distant.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(fa), Some(fb)) if fa.len() == fb.len() && !fa.is_empty() => {
                let diff = fa.iter().zip(fb.iter()).filter(|(x, y)| x != y).count();
                diff as f64 / fa.len() as f64
            }
            _ => 1.0,
        }
    }
}

/// An ordered, read-only collection of words plus its feature specifier.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: Vec<Word>,
    specifier: FeatureMatrix,
}

impl Corpus {
    /// Build a corpus with an empty feature specifier.
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            specifier: FeatureMatrix::new(),
        }
    }

    /// Build a corpus with a feature specifier for phonological alignment.
    pub fn with_specifier(words: Vec<Word>, specifier: FeatureMatrix) -> Self {
        Self { words, specifier }
    }

    /// The words in corpus order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// The feature specifier.
    pub fn specifier(&self) -> &FeatureMatrix {
        &self.specifier
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the corpus has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over words in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_flattens_transcription() {
        let word = Word::new("dish", &["d", "ɪ", "ʃ"]);
        assert_eq!(word.form(Representation::Transcription), "dɪʃ");
        assert_eq!(word.form(Representation::Spelling), "dish");
    }

    #[test]
    fn test_spelling_segments_are_graphemes() {
        let word = Word::new("naïve", &["n", "ɑ", "i", "v"]);
        let segments = word.segments(Representation::Spelling);
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[2], "ï");
    }

    #[test]
    fn test_feature_distance() {
        let mut matrix = FeatureMatrix::new();
        matrix.insert("s", vec![1, -1, 1, 1]);
        matrix.insert("ʃ", vec![1, -1, -1, 1]);

        assert_eq!(matrix.distance("s", "s"), 0.0);
        assert_eq!(matrix.distance("s", "ʃ"), 0.25);
        // Unknown symbols are maximally distant
        assert_eq!(matrix.distance("s", "x"), 1.0);
    }

    #[test]
    fn test_corpus_order_preserved() {
        let corpus = Corpus::new(vec![
            Word::new("cat", &["k", "æ", "t"]),
            Word::new("dish", &["d", "ɪ", "ʃ"]),
        ]);
        let spellings: Vec<_> = corpus.iter().map(|w| w.spelling.as_str()).collect();
        assert_eq!(spellings, vec!["cat", "dish"]);
    }
}
