//! Feature-weighted phonological alignment of transcriptions.
//!
//! The aligner decides whether a surviving candidate pair actually implicates
//! the two segments under analysis, as opposed to differing somewhere else
//! entirely.

use ndarray::Array2;

use crate::corpus::FeatureMatrix;
use crate::types::{Alignment, EditOp};

/// Gap marker in aligned sequences.
pub const GAP: &str = "-";

/// Aligns two segment sequences under a feature specification.
pub struct Aligner<'a> {
    features: &'a FeatureMatrix,
}

impl<'a> Aligner<'a> {
    /// Build an aligner over a corpus's feature specifier.
    pub fn new(features: &'a FeatureMatrix) -> Self {
        Self { features }
    }

    /// Globally align two segment sequences.
    ///
    /// Substitution cost is the normalized feature distance between the two
    /// segments, so featurally close segments (s/ʃ) align as substitutions
    /// rather than being pushed into insertion-deletion columns.
    pub fn align(&self, a: &[String], b: &[String]) -> Alignment {
        let len_a = a.len();
        let len_b = b.len();

        if len_a == 0 || len_b == 0 {
            let cost = (len_a + len_b) as f64;
            let ops = if len_a == 0 {
                vec![EditOp::Insert; len_b]
            } else {
                vec![EditOp::Delete; len_a]
            };
            let gapped_a = if len_a == 0 {
                vec![GAP.to_string(); len_b]
            } else {
                a.to_vec()
            };
            let gapped_b = if len_b == 0 {
                vec![GAP.to_string(); len_a]
            } else {
                b.to_vec()
            };
            return Alignment::new(gapped_a, gapped_b, ops, cost);
        }

        let mut cost = Array2::<f64>::from_elem((len_a + 1, len_b + 1), f64::INFINITY);
        cost[[0, 0]] = 0.0;
        for i in 1..=len_a {
            cost[[i, 0]] = i as f64;
        }
        for j in 1..=len_b {
            cost[[0, j]] = j as f64;
        }

        for i in 1..=len_a {
            for j in 1..=len_b {
                let subst = self.features.distance(&a[i - 1], &b[j - 1]);
                cost[[i, j]] = f64::min(
                    cost[[i - 1, j - 1]] + subst,
                    f64::min(cost[[i - 1, j]] + 1.0, cost[[i, j - 1]] + 1.0),
                );
            }
        }

        // Backtrack to recover the column sequence
        let mut i = len_a;
        let mut j = len_b;
        let mut operations = Vec::new();
        let mut aligned_a = Vec::new();
        let mut aligned_b = Vec::new();

        while i > 0 || j > 0 {
            if i == 0 {
                operations.push(EditOp::Insert);
                aligned_a.push(GAP.to_string());
                aligned_b.push(b[j - 1].clone());
                j -= 1;
            } else if j == 0 {
                operations.push(EditOp::Delete);
                aligned_a.push(a[i - 1].clone());
                aligned_b.push(GAP.to_string());
                i -= 1;
            } else {
                let subst = self.features.distance(&a[i - 1], &b[j - 1]);
                let diag = cost[[i - 1, j - 1]] + subst;
                let up = cost[[i - 1, j]] + 1.0;
                let left = cost[[i, j - 1]] + 1.0;

                if diag <= up && diag <= left {
                    if a[i - 1] == b[j - 1] {
                        operations.push(EditOp::Match);
                    } else {
                        operations.push(EditOp::Substitute);
                    }
                    aligned_a.push(a[i - 1].clone());
                    aligned_b.push(b[j - 1].clone());
                    i -= 1;
                    j -= 1;
                } else if up < left {
                    operations.push(EditOp::Delete);
                    aligned_a.push(a[i - 1].clone());
                    aligned_b.push(GAP.to_string());
                    i -= 1;
                } else {
                    operations.push(EditOp::Insert);
                    aligned_a.push(GAP.to_string());
                    aligned_b.push(b[j - 1].clone());
                    j -= 1;
                }
            }
        }

        operations.reverse();
        aligned_a.reverse();
        aligned_b.reverse();

        Alignment::new(aligned_a, aligned_b, operations, cost[[len_a, len_b]])
    }

    /// Whether the alignment evidences a relation between the two segments.
    ///
    /// A difference somewhere in the pair is not enough: the alignment must
    /// pair `s1` with `s2` in a substitution column, or drop `s1` in one form
    /// while the other form gains `s2` (or vice versa). Differences that do
    /// not involve the two segments are ignored.
    pub fn is_related(&self, alignment: &Alignment, s1: &str, s2: &str) -> bool {
        for (a, b) in alignment.correspondences() {
            if (a == s1 && b == s2) || (a == s2 && b == s1) {
                return true;
            }
        }

        let mut dropped_s1 = false;
        let mut dropped_s2 = false;
        for (idx, op) in alignment.operations.iter().enumerate() {
            if matches!(op, EditOp::Insert | EditOp::Delete) {
                let segment = if alignment.sequence_a[idx] == GAP {
                    &alignment.sequence_b[idx]
                } else {
                    &alignment.sequence_a[idx]
                };
                if segment == s1 {
                    dropped_s1 = true;
                } else if segment == s2 {
                    dropped_s2 = true;
                }
            }
        }
        dropped_s1 && dropped_s2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn sibilant_matrix() -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new();
        matrix.insert("d", vec![1, 1, -1, -1]);
        matrix.insert("ɪ", vec![-1, -1, 1, -1]);
        matrix.insert("s", vec![1, -1, -1, 1]);
        matrix.insert("ʃ", vec![1, -1, -1, -1]);
        matrix.insert("k", vec![1, 1, 1, 1]);
        matrix.insert("æ", vec![-1, -1, 1, 1]);
        matrix.insert("t", vec![1, 1, -1, 1]);
        matrix
    }

    #[test]
    fn test_align_equal_length() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        let alignment = aligner.align(&segs(&["d", "ɪ", "ʃ"]), &segs(&["d", "ɪ", "s"]));

        assert_eq!(alignment.operations.len(), 3);
        assert_eq!(alignment.operations[2], EditOp::Substitute);
        assert!(alignment.cost < 1.0); // ʃ/s are featurally close
    }

    #[test]
    fn test_align_with_gap() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        let alignment = aligner.align(&segs(&["d", "ɪ", "ʃ"]), &segs(&["d", "ɪ"]));

        assert_eq!(alignment.operations.len(), 3);
        assert_eq!(alignment.sequence_b[2], GAP);
    }

    #[test]
    fn test_related_via_substitution() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        let alignment = aligner.align(&segs(&["d", "ɪ", "ʃ"]), &segs(&["d", "ɪ", "s"]));

        assert!(aligner.is_related(&alignment, "s", "ʃ"));
        assert!(aligner.is_related(&alignment, "ʃ", "s"));
    }

    #[test]
    fn test_unrelated_difference_is_ignored() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        // The forms differ, but not in a way that implicates s or ʃ
        let alignment = aligner.align(&segs(&["d", "ɪ", "t"]), &segs(&["d", "ɪ", "k"]));

        assert!(!aligner.is_related(&alignment, "s", "ʃ"));
    }

    #[test]
    fn test_related_via_paired_gaps() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        let alignment = Alignment::new(
            segs(&["s", "æ", GAP]),
            segs(&[GAP, "æ", "ʃ"]),
            vec![EditOp::Delete, EditOp::Match, EditOp::Insert],
            2.0,
        );

        assert!(aligner.is_related(&alignment, "s", "ʃ"));
        assert!(!aligner.is_related(&alignment, "s", "t"));
    }

    #[test]
    fn test_empty_form_alignment() {
        let matrix = sibilant_matrix();
        let aligner = Aligner::new(&matrix);
        let alignment = aligner.align(&segs(&[]), &segs(&["s", "æ"]));

        assert_eq!(alignment.operations, vec![EditOp::Insert, EditOp::Insert]);
        assert_eq!(alignment.cost, 2.0);
    }
}
