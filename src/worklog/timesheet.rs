//! Flattens timesheet gadget responses into sorted `WorklogRecord`s.

use chrono::{DateTime, Local, NaiveDateTime, Timelike, Utc};
use jira_api::TimesheetIssue;
use log::warn;

use super::{WorklogId, WorklogRecord};

const SUMMARY_LIMIT: usize = 40;
const COMMENT_LIMIT: usize = 31;

/// One record per timesheet entry, ordered by start time.
///
/// The sort is stable, so entries starting in the same minute keep server order.
pub fn normalize(raw: &[TimesheetIssue], truncate: bool) -> Vec<WorklogRecord> {
    let mut records: Vec<WorklogRecord> = raw
        .iter()
        .flat_map(|issue| {
            issue.entries.iter().filter_map(move |entry| {
                let Some(started) = local_minute(entry.start_date) else {
                    warn!(
                        "skipping worklog {} on {}: start {} is out of range",
                        entry.id, issue.key, entry.start_date
                    );
                    return None;
                };
                let comment = entry.comment.clone().unwrap_or_default();
                Some(WorklogRecord {
                    id: WorklogId::Existing(entry.id),
                    date: started.date(),
                    started,
                    issue_key: issue.key.clone(),
                    summary: if truncate {
                        truncate_chars(&issue.summary, SUMMARY_LIMIT)
                    } else {
                        issue.summary.clone()
                    },
                    comment: if truncate {
                        truncate_chars(&comment, COMMENT_LIMIT)
                    } else {
                        comment
                    },
                    time_spent_seconds: entry.time_spent,
                })
            })
        })
        .collect();
    records.sort_by_key(|record| record.started);
    records
}

fn local_minute(epoch_millis: i64) -> Option<NaiveDateTime> {
    let utc = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?;
    let local = utc.with_timezone(&Local).naive_local();
    local.with_second(0)?.with_nanosecond(0)
}

/// First `limit` characters plus `..` when the text is longer than `limit`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut short: String = text.chars().take(limit).collect();
        short.push_str("..");
        short
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use jira_api::TimesheetEntry;

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn entry(id: u64, start_date: i64, comment: &str) -> TimesheetEntry {
        TimesheetEntry {
            id,
            author: "alice".to_string(),
            author_full_name: "Alice".to_string(),
            start_date,
            time_spent: 1800,
            comment: Some(comment.to_string()),
        }
    }

    fn issue(key: &str, summary: &str, entries: Vec<TimesheetEntry>) -> TimesheetIssue {
        TimesheetIssue {
            key: key.to_string(),
            summary: summary.to_string(),
            entries,
        }
    }

    #[test]
    fn flattens_and_sorts_by_start() {
        let raw = vec![
            issue("ABC-2", "Later", vec![entry(2, millis(2024, 3, 4, 13, 0, 0), "b")]),
            issue(
                "ABC-1",
                "Earlier",
                vec![
                    entry(1, millis(2024, 3, 4, 9, 15, 42), "a"),
                    entry(3, millis(2024, 3, 5, 8, 0, 0), "c"),
                ],
            ),
        ];

        let records = normalize(&raw, false);

        let ids: Vec<WorklogId> = records.iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![WorklogId::Existing(1), WorklogId::Existing(2), WorklogId::Existing(3)]
        );
        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(first.started.format("%H:%M:%S").to_string(), "09:15:00");
        assert_eq!(first.summary, "Earlier");
    }

    #[test]
    fn same_minute_entries_keep_server_order() {
        let at = millis(2024, 3, 4, 10, 0, 0);
        let raw = vec![issue("ABC-1", "x", vec![entry(9, at, "first"), entry(4, at + 20_000, "second")])];
        let records = normalize(&raw, false);
        assert_eq!(records[0].comment, "first");
        assert_eq!(records[1].comment, "second");
    }

    #[test]
    fn truncates_by_characters() {
        let summary = "å".repeat(45);
        let comment = "ø".repeat(32);
        let raw = vec![issue("ABC-1", &summary, vec![entry(1, millis(2024, 3, 4, 9, 0, 0), &comment)])];

        let records = normalize(&raw, true);

        assert_eq!(records[0].summary, format!("{}..", "å".repeat(40)));
        assert_eq!(records[0].comment, format!("{}..", "ø".repeat(31)));
        assert_eq!(truncate_chars("exactly", 7), "exactly");
    }
}
