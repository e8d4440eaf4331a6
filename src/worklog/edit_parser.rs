//! The editable worklog block: rendering records to text lines and parsing
//! the edited text back.
//!
//! ```text
//! (#123456)   ABC-12         09:00   1h 30m  Code review
//! (#new)      ABC-7          13:15   0h 45m  Standup
//! ```

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::duration::{format_duration, parse_duration, DURATION_PATTERN};
use super::{WorklogId, WorklogRecord};

pub const ISSUE_KEY_PATTERN: &str = r"[A-Z]{2,9}-[0-9]{1,4}";
const COMMENT_PATTERN: &str = r#"[\p{L}\p{N}\s,.:;!?'"/()&+\-_@*=]*"#;

static ISSUE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{ISSUE_KEY_PATTERN}$")).expect("invalid issue key regex")
});

static COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{COMMENT_PATTERN}$")).expect("invalid comment regex"));

static LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*\(#(?P<id>new|[0-9]+)\)\s+(?P<key>{ISSUE_KEY_PATTERN})\s+(?P<time>(?:[01][0-9]|2[0-3]):[0-5][0-9])\s+(?P<duration>{DURATION_PATTERN})(?:\s+(?P<comment>{COMMENT_PATTERN}))?\s*$"
    ))
    .expect("invalid worklog line regex")
});

pub fn is_valid_issue_key(key: &str) -> bool {
    ISSUE_KEY_REGEX.is_match(key)
}

/// Canonical comment text: runs of whitespace (newlines included) become one space.
pub fn editable_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `record` survives a render/parse round trip unchanged.
pub fn is_editable(record: &WorklogRecord) -> bool {
    is_valid_issue_key(&record.issue_key)
        && COMMENT_REGEX.is_match(&editable_comment(&record.comment))
}

/// Parses an edited block; every matching line becomes a record dated `reference_date`.
///
/// Lines that do not match the grammar are skipped.
pub fn parse_edited_block(reference_date: NaiveDate, text: &[u8]) -> Vec<WorklogRecord> {
    let text = String::from_utf8_lossy(text);
    text.lines()
        .filter_map(|line| parse_line(reference_date, line))
        .collect()
}

fn parse_line(reference_date: NaiveDate, line: &str) -> Option<WorklogRecord> {
    let captures = LINE_REGEX.captures(line)?;

    let id = match &captures["id"] {
        "new" => WorklogId::New,
        digits => WorklogId::Existing(digits.parse().ok()?),
    };
    let time = NaiveTime::parse_from_str(&captures["time"], "%H:%M").ok()?;
    let time_spent_seconds = parse_duration(&captures["duration"]).ok()?;
    let comment = captures
        .name("comment")
        .map(|m| editable_comment(m.as_str()))
        .unwrap_or_default();

    Some(WorklogRecord {
        id,
        date: reference_date,
        started: reference_date.and_time(time),
        issue_key: captures["key"].to_string(),
        summary: String::new(),
        comment,
        time_spent_seconds,
    })
}

/// Renders `records` as an editable block for `date`.
///
/// Records that would not parse back identically are emitted as `#` lines so
/// they are left alone, and an issue legend follows the data lines.
pub fn render_edit_block(date: NaiveDate, records: &[WorklogRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Worklog for {}\n", date.format("%Y-%m-%d")));
    out.push_str("# Change time, duration or comment. Add lines with (#new) to create worklogs.\n");
    out.push_str("# Lines starting with # are ignored and removing a line does not delete anything.\n");
    out.push_str("#\n");

    for record in records {
        let line = render_line(record);
        if is_editable(record) {
            out.push_str(&line);
        } else {
            out.push_str("# ");
            out.push_str(&line);
        }
        out.push('\n');
    }

    let mut seen = HashSet::new();
    let legend: Vec<&WorklogRecord> = records
        .iter()
        .filter(|record| seen.insert(record.issue_key.as_str()))
        .collect();
    if !legend.is_empty() {
        out.push_str("#\n# Issues:\n");
        for record in legend {
            out.push_str(&format!("# {:<12} {}\n", record.issue_key, record.summary));
        }
    }
    out
}

/// Columns are padded for the common case; the single space after each padded
/// column keeps long ids and 14-character keys separated.
fn render_line(record: &WorklogRecord) -> String {
    let marker = format!("(#{})", record.id);
    let line = format!(
        "{:<11} {:<14} {}  {:>7}  {}",
        marker,
        record.issue_key,
        record.started.format("%H:%M"),
        format_duration(record.time_spent_seconds, false),
        editable_comment(&record.comment)
    );
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn record(id: WorklogId, key: &str, hm: (u32, u32), seconds: u64, comment: &str) -> WorklogRecord {
        WorklogRecord {
            id,
            date: day(),
            started: day().and_hms_opt(hm.0, hm.1, 0).unwrap(),
            issue_key: key.to_string(),
            summary: "Some summary".to_string(),
            comment: comment.to_string(),
            time_spent_seconds: seconds,
        }
    }

    #[test]
    fn parses_existing_and_new_lines() {
        let text = b"# header\n(#123456) ABC-12 09:00 1h 30m Code review, part 2\n(#new)   XY-1   13:15 45m\nnot a worklog\n";
        let records = parse_edited_block(day(), text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, WorklogId::Existing(123456));
        assert_eq!(records[0].issue_key, "ABC-12");
        assert_eq!(records[0].started, day().and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(records[0].time_spent_seconds, 5400);
        assert_eq!(records[0].comment, "Code review, part 2");
        assert_eq!(records[1].id, WorklogId::New);
        assert_eq!(records[1].time_spent_seconds, 2700);
        assert_eq!(records[1].comment, "");
        assert!(records.iter().all(|r| r.summary.is_empty() && r.date == day()));
    }

    #[test]
    fn skips_lines_with_invalid_fields() {
        let text = b"(#1) abc-1 09:00 1h Lowercase key\n\
(#2) ABC-1 24:00 1h Bad hour\n\
(#3) ABC-1 09:00 5x Bad duration\n\
(#4) ABC-1 09:00 1h Bad <chars>\n\
(#5) ABCDEFGHIJ-1 09:00 1h Key too long\n\
# (#6) ABC-1 09:00 1h Commented out\n";
        assert!(parse_edited_block(day(), text).is_empty());
    }

    #[test]
    fn accepts_unicode_letters_and_punctuation_in_comments() {
        let text = "(#7) ABC-1 08:05 0.5h Møte med kunde: \"plan\" (v2) & test_run @home done?";
        let records = parse_edited_block(day(), text.as_bytes());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time_spent_seconds, 1800);
        assert!(records[0].comment.starts_with("Møte med kunde"));
    }

    #[test]
    fn editable_comment_collapses_whitespace() {
        assert_eq!(editable_comment("  two\nlines \t here "), "two lines here");
    }

    #[test]
    fn render_then_parse_reproduces_editable_records() {
        let records = vec![
            record(WorklogId::Existing(100), "ABC-1", (9, 0), 3600, "Planning\nsession"),
            record(WorklogId::Existing(101), "ABC-2", (10, 30), 5400, ""),
            record(WorklogId::Existing(102), "ABC-3", (12, 0), 600, "Uses <html> tags"),
        ];

        let block = render_edit_block(day(), &records);
        let parsed = parse_edited_block(day(), block.as_bytes());

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, WorklogId::Existing(100));
        assert_eq!(parsed[0].comment, "Planning session");
        assert_eq!(parsed[1].time_spent_seconds, 5400);
        assert!(block.contains("# (#102)"));
        assert!(block.contains(&format!("# {:<12} Some summary", "ABC-1")));
    }

    #[test]
    fn long_ids_and_keys_stay_separated() {
        let records = vec![
            record(WorklogId::Existing(12345678), "ABC-1", (9, 0), 3600, "work"),
            record(WorklogId::Existing(123456), "PROJECT-123", (10, 0), 1800, "review"),
            record(WorklogId::Existing(1), "ABCDEFGHI-1234", (11, 15), 600, ""),
            record(WorklogId::Existing(123456789012), "ABCDEFGHI-1234", (12, 0), 60, "max"),
        ];

        let block = render_edit_block(day(), &records);
        let parsed = parse_edited_block(day(), block.as_bytes());

        assert_eq!(parsed.len(), records.len(), "{block}");
        for (before, after) in records.iter().zip(&parsed) {
            assert_eq!(after.id, before.id);
            assert_eq!(after.issue_key, before.issue_key);
            assert_eq!(after.started, before.started);
            assert_eq!(after.time_spent_seconds, before.time_spent_seconds);
            assert_eq!(after.comment, before.comment);
        }
    }

    #[test]
    fn is_editable_checks_key_and_comment() {
        assert!(is_editable(&record(WorklogId::Existing(1), "ABC-1", (9, 0), 60, "fine")));
        assert!(!is_editable(&record(WorklogId::Existing(1), "ABC-1", (9, 0), 60, "{code}")));
        assert!(!is_editable(&record(WorklogId::Existing(1), "A-1", (9, 0), 60, "fine")));
    }
}
