//! Frequency-list ingestion and lexicon emission.
//!
//! The source format is line-oriented UTF-8: `<count> TAB <form>`,
//! with `#` starting a comment that runs to the end of the line.
//! Records with the wrong field count or an unparsable count are
//! skipped silently; this leniency is a documented convention of the
//! source lists, not an accident.

use std::io::{BufRead, Write};

use crate::collate;
use crate::error::G2PError;
use crate::g2p::G2P;

pub const LICENSE_LINE: &str = "# SPDX-License-Identifier: Unicode-DFS-2016";

/// One record of the input frequency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub count: u64,
    pub form: String,
}

/// Parses one source line into an entry. Returns `None` for blank
/// lines, comment-only lines, and malformed records.
pub fn parse_line(line: &str) -> Option<LexiconEntry> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return None;
    }
    let mut fields = line.split('\t');
    let (count, form) = match (fields.next(), fields.next(), fields.next()) {
        (Some(count), Some(form), None) => (count, form),
        _ => {
            tracing::debug!(line, "skipping record with wrong field count");
            return None;
        }
    };
    let Ok(count) = count.trim().parse::<u64>() else {
        tracing::debug!(line, "skipping record with non-numeric count");
        return None;
    };
    Some(LexiconEntry {
        count,
        form: form.trim().to_string(),
    })
}

/// Reads every well-formed entry from a frequency list.
pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<LexiconEntry>, G2PError> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        if let Some(entry) = parse_line(&line?) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Runs the full batch: phonemize every entry, fail fast on the first
/// invalid one, then emit the header and the collation-sorted
/// `form TAB pronunciation` lines.
///
/// Nothing is written until every entry has validated, so a failed run
/// never leaves partial output behind.
pub fn generate<R: BufRead, W: Write>(
    g2p: &G2P,
    reader: R,
    mut writer: W,
) -> Result<(), G2PError> {
    let mut rows: Vec<String> = Vec::new();
    for entry in read_entries(reader)? {
        let pronunciation = g2p.phonemize(&entry.form)?;
        rows.push(format!("{}\t{}", entry.form, pronunciation));
    }
    rows.sort_by(|a, b| collate::compare(a, b));

    writeln!(writer, "Form\tPronunciation")?;
    writeln!(writer)?;
    writeln!(writer, "{LICENSE_LINE}")?;
    writeln!(writer)?;
    for row in rows {
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_parse_line_basic() {
        assert_eq!(
            parse_line("42\tgato"),
            Some(LexiconEntry {
                count: 42,
                form: "gato".to_string()
            })
        );
    }

    #[test]
    fn test_parse_line_strips_trailing_comment() {
        assert_eq!(
            parse_line("7\tghe # particle"),
            Some(LexiconEntry {
                count: 7,
                form: "ghe".to_string()
            })
        );
    }

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# header"), None);
    }

    #[test]
    fn test_parse_line_skips_malformed_records() {
        assert_eq!(parse_line("gato"), None);
        assert_eq!(parse_line("1\tgato\textra"), None);
        assert_eq!(parse_line("many\tgato"), None);
    }

    #[test]
    fn test_generate_sorted_output() {
        let g2p = G2P::new(Language::Venetian).unwrap();
        let input = "3\tzo\n12\tgàto\n5\tàcua\n";
        let mut out = Vec::new();
        generate(&g2p, input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Form\tPronunciation");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], LICENSE_LINE);
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "àcua\tˈa.kwa");
        assert_eq!(lines[5], "gàto\tˈɡa.to");
        assert_eq!(lines[6], "zo\tzo");
    }

    #[test]
    fn test_generate_fails_fast_without_output() {
        let g2p = G2P::new(Language::Venetian).unwrap();
        let input = "1\tgato\n1\tgoħa\n";
        let mut out = Vec::new();
        let err = generate(&g2p, input.as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, G2PError::UncoveredPhonemes { .. }));
        assert!(out.is_empty(), "no partial output on validation failure");
    }
}
