//! Tab-delimited report sink for completed analyses.
//!
//! Reports are written to a temp file and atomically persisted, so a crash or
//! cancellation never leaves a truncated report on disk.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::types::AlternationReport;

/// Write a completed report as UTF-8, CRLF-terminated, tab-separated text.
///
/// Layout: a header row and one row per surviving pair, then a `Stats`
/// section with the partition counts, denominator, numerator, and the
/// frequency itself.
pub fn write_report(path: &Path, report: &AlternationReport) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut out = BufWriter::new(&temp);
        write!(out, "FirstWord\tSecondWord\tRelatednessScore\r\n\r\n")?;
        for pair in &report.pairs {
            write!(out, "{}\t{}\t{}\r\n", pair.first, pair.second, pair.score)?;
        }
        write!(out, "\r\nStats\r\n------\r\n")?;
        write!(
            out,
            "words_with_{}\t{}\r\n",
            report.segments.0, report.first_count
        )?;
        write!(
            out,
            "words_with_{}\t{}\r\n",
            report.segments.1, report.second_count
        )?;
        write!(out, "total_words\t{}\r\n", report.summary.total_words)?;
        write!(
            out,
            "total_words_alter\t{}\r\n",
            report.summary.alternating_words
        )?;
        write!(out, "freq_of_alter\t{}\r\n", report.summary.frequency)?;
        out.flush()?;
    }
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlternationPair, AlternationSummary};

    fn sample_report() -> AlternationReport {
        AlternationReport {
            segments: ("s".to_string(), "ʃ".to_string()),
            first_count: 2,
            second_count: 1,
            pairs: vec![AlternationPair::new(
                "diss".to_string(),
                "dish".to_string(),
                0.5,
            )],
            summary: AlternationSummary {
                total_words: 2,
                alternating_words: 2,
                frequency: 1.0,
            },
        }
    }

    #[test]
    fn test_report_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq_of_alt.txt");
        write_report(&path, &sample_report()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("\r\n"));
        assert!(!text.contains("\n\n")); // CRLF throughout

        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "FirstWord\tSecondWord\tRelatednessScore");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "diss\tdish\t0.5");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Stats");
        assert_eq!(lines[5], "------");
        assert_eq!(lines[6], "words_with_s\t2");
        assert_eq!(lines[7], "words_with_ʃ\t1");
        assert_eq!(lines[8], "total_words\t2");
        assert_eq!(lines[9], "total_words_alter\t2");
        assert_eq!(lines[10], "freq_of_alter\t1");
    }

    #[test]
    fn test_report_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        write_report(&path, &sample_report()).unwrap();
        assert!(path.exists());
    }
}
