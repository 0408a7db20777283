//! Parsing of delimited `git log` output into [`CommitRecord`]s.
//!
//! Each commit is one physical line: hash, parent hashes, author, Unix
//! timestamp, subject and (optionally) ref decorations, separated by a
//! delimiter that does not occur in commit metadata.

use tracing::{debug, warn};

use crate::git::error_handling::{ParseWarning, WarningKind};
use crate::models::CommitRecord;

/// ASCII unit separator.
pub const DEFAULT_DELIMITER: char = '\u{1f}';

/// Hash, parents, author, timestamp and subject are required.
pub const MIN_FIELDS: usize = 5;

const FIELD_PLACEHOLDERS: [&str; 6] = ["%H", "%P", "%an", "%at", "%s", "%D"];

/// Build the `--pretty=format:` argument producing lines this parser reads.
pub fn log_format(delimiter: char) -> String {
    let separator = if delimiter.is_ascii_control() || delimiter == '%' {
        format!("%x{:02x}", delimiter as u32)
    } else {
        delimiter.to_string()
    };
    format!("--pretty=format:{}", FIELD_PLACEHOLDERS.join(&separator))
}

/// Result of parsing one log batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub records: Vec<CommitRecord>,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone)]
pub struct LogParser {
    delimiter: char,
    clock: fn() -> i64,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

fn wall_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

impl LogParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            clock: wall_clock,
        }
    }

    /// Replace the clock used when a timestamp cannot be parsed.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse a whole batch. Malformed lines never abort the batch.
    pub fn parse(&self, text: &str) -> ParsedLog {
        let mut parsed = ParsedLog::default();

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(record) = self.parse_line(index + 1, line, &mut parsed.warnings) {
                parsed.records.push(record);
            }
        }

        debug!(
            "Parsed {} commit records with {} warnings",
            parsed.records.len(),
            parsed.warnings.len()
        );
        parsed
    }

    fn parse_line(
        &self,
        line_number: usize,
        line: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Option<CommitRecord> {
        let fields: Vec<&str> = line.split(self.delimiter).collect();

        if fields.len() < MIN_FIELDS {
            Self::report(
                warnings,
                line_number,
                line,
                WarningKind::TooFewFields { found: fields.len() },
            );
            return None;
        }

        let hash = fields[0].trim();
        if hash.is_empty() {
            Self::report(warnings, line_number, line, WarningKind::EmptyHash);
            return None;
        }

        let parent_hashes = fields[1].split_whitespace().map(str::to_string).collect();

        let raw_timestamp = fields[3].trim();
        let timestamp = match raw_timestamp.parse::<i64>() {
            Ok(timestamp) => timestamp,
            Err(_) => {
                Self::report(
                    warnings,
                    line_number,
                    line,
                    WarningKind::InvalidTimestamp {
                        value: raw_timestamp.to_string(),
                    },
                );
                (self.clock)()
            }
        };

        let ref_names = fields.get(5).map(|refs| refs.trim()).unwrap_or_default();

        Some(CommitRecord::new(
            hash,
            parent_hashes,
            fields[2].trim(),
            timestamp,
            fields[4].trim(),
            ref_names,
        ))
    }

    fn report(warnings: &mut Vec<ParseWarning>, line_number: usize, line: &str, kind: WarningKind) {
        let warning = ParseWarning {
            line_number,
            line: line.to_string(),
            kind,
        };
        warn!("Malformed commit record: {}", warning);
        warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn fixed_clock() -> i64 {
        42
    }

    fn parser() -> LogParser {
        LogParser::new('|').with_clock(fixed_clock)
    }

    #[test]
    fn test_parses_complete_record() {
        let parsed = parser().parse("abc123|p1 p2|Alice|1700000000|Merge things|HEAD -> main, tag: v1\n");

        assert!(parsed.warnings.is_empty());
        assert_eq!(
            parsed.records,
            vec![CommitRecord::new(
                "abc123",
                vec!["p1".to_string(), "p2".to_string()],
                "Alice",
                1_700_000_000,
                "Merge things",
                "HEAD -> main, tag: v1",
            )]
        );
    }

    #[test]
    fn test_missing_ref_field_is_empty() {
        let parsed = parser().parse("abc|p1|Bob|100|Subject");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].ref_names, "");
    }

    #[test]
    fn test_root_commit_has_no_parents() {
        let parsed = parser().parse("abc||Bob|100|Initial commit|");
        assert!(parsed.records[0].parent_hashes.is_empty());
    }

    #[test]
    fn test_extra_parent_whitespace_dropped() {
        let parsed = parser().parse("abc|  p1    p2 |Bob|100|Subject|");
        assert_eq!(parsed.records[0].parent_hashes, vec!["p1", "p2"]);
    }

    #[test]
    fn test_blank_lines_skipped_silently() {
        let parsed = parser().parse("\n   \nabc||Bob|100|Subject|\n\t\n");
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_short_line_skipped_with_warning() {
        let parsed = parser().parse("good||Bob|100|Subject|\nbroken|p1|Bob\nnext|good|Eve|200|Other|");

        let hashes: Vec<&str> = parsed.records.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["good", "next"]);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning {
                line_number: 2,
                line: "broken|p1|Bob".to_string(),
                kind: WarningKind::TooFewFields { found: 3 },
            }]
        );
    }

    #[test]
    fn test_empty_hash_skipped_with_warning() {
        let parsed = parser().parse(" |p1|Bob|100|Subject|");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.warnings[0].kind, WarningKind::EmptyHash);
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_clock() {
        let parsed = parser().parse("abc||Bob|yesterday|Subject|");

        assert_eq!(parsed.records[0].timestamp, 42);
        assert_eq!(
            parsed.warnings[0].kind,
            WarningKind::InvalidTimestamp {
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let parsed = parser().parse("a||Bob|1|One|main\r\nb|a|Bob|2|Two|\r\n");
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].ref_names, "main");
    }

    #[test]
    fn test_log_format_escapes_control_delimiter() {
        assert_eq!(
            log_format(DEFAULT_DELIMITER),
            "--pretty=format:%H%x1f%P%x1f%an%x1f%at%x1f%s%x1f%D"
        );
        assert_eq!(log_format('|'), "--pretty=format:%H|%P|%an|%at|%s|%D");
    }

    #[test]
    fn test_default_delimiter_round_trip() {
        let line = ["abc", "def", "Carol", "300", "Fix", "main"].join("\u{1f}");
        let parsed = LogParser::default().parse(&line);
        assert_eq!(parsed.records[0].author, "Carol");
        assert_eq!(parsed.records[0].ref_names, "main");
    }

    proptest! {
        #[test]
        fn test_parse_never_panics(input in "\\PC*") {
            let parsed = parser().parse(&input);
            prop_assert!(parsed.records.iter().all(|r| !r.hash.is_empty()));
        }

        #[test]
        fn test_every_line_is_a_record_or_warning(
            lines in proptest::collection::vec("[a-z0-9|]{0,30}", 0..20)
        ) {
            let text = lines.join("\n");
            let parsed = parser().parse(&text);
            let non_blank = lines.iter().filter(|l| !l.trim().is_empty()).count();
            let dropped = parsed
                .warnings
                .iter()
                .filter(|w| !matches!(w.kind, WarningKind::InvalidTimestamp { .. }))
                .count();
            prop_assert_eq!(parsed.records.len() + dropped, non_blank);
        }
    }
}
