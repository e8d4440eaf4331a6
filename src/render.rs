//! Terminal output: tables, target colouring and comment formatting.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_HORIZONTAL_ONLY;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use jira_api::{Comment, Issue, SprintIssue, Transition, Worklog};

use crate::worklog::dates::{format_date, is_today};
use crate::worklog::duration::{format_duration, format_hours};
use crate::worklog::stats::{Week, WorkTargets};
use crate::worklog::timesheet::truncate_chars;
use crate::worklog::WorklogRecord;

const ISSUE_SUMMARY_LIMIT: usize = 60;

/// Colour class of a statistic compared with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetColor {
    OnTarget,
    Zero,
    Below,
}

impl TargetColor {
    pub fn classify(value: f64, on_target: bool) -> Self {
        if on_target {
            TargetColor::OnTarget
        } else if value == 0.0 {
            TargetColor::Zero
        } else {
            TargetColor::Below
        }
    }

    fn table_color(self) -> Color {
        match self {
            TargetColor::OnTarget => Color::Green,
            TargetColor::Zero => Color::Blue,
            TargetColor::Below => Color::Red,
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold).fg(Color::Yellow))
                .collect::<Vec<_>>(),
        );
    table
}

fn target_cell(text: String, value: f64, on_target: bool) -> Cell {
    Cell::new(text)
        .fg(TargetColor::classify(value, on_target).table_color())
        .set_alignment(CellAlignment::Right)
}

pub fn issues_table(issues: &[Issue]) -> Table {
    let mut table = new_table(vec!["Key", "Type", "Priority", "Summary", "Status", "Assignee"]);
    for issue in issues {
        let fields = &issue.fields;
        table.add_row(vec![
            Cell::new(&issue.key),
            Cell::new(fields.issue_type.as_ref().map(|t| t.name.as_str()).unwrap_or("")),
            Cell::new(fields.priority.as_ref().map(|p| p.name.as_str()).unwrap_or("")),
            Cell::new(truncate_chars(&fields.summary, ISSUE_SUMMARY_LIMIT)),
            Cell::new(fields.status_name()).fg(Color::Green),
            Cell::new(fields.assignee_name()),
        ]);
    }
    table
}

pub fn sprint_issues_table(issues: &[&SprintIssue]) -> Table {
    let mut table = new_table(vec!["Key", "Type", "Priority", "Summary", "Status", "Assignee"]);
    for issue in issues {
        let status = Cell::new(issue.status_name.as_deref().unwrap_or(""));
        table.add_row(vec![
            Cell::new(&issue.key),
            Cell::new(issue.type_name.as_deref().unwrap_or("")),
            Cell::new(issue.priority_name.as_deref().unwrap_or("")),
            Cell::new(truncate_chars(&issue.summary, ISSUE_SUMMARY_LIMIT)),
            if issue.done { status.fg(Color::Green) } else { status },
            Cell::new(issue.assignee_name.as_deref().unwrap_or("Unassigned")),
        ]);
    }
    table
}

/// Timesheet rows; entries dated today are highlighted.
pub fn my_worklog_table(records: &[WorklogRecord]) -> Table {
    let mut table = new_table(vec!["Date", "Time", "Key", "Summary", "Comment", "Time Spent"]);
    for record in records {
        let mut cells = vec![
            Cell::new(format_date(record.date)),
            Cell::new(record.started.format("%H:%M")),
            Cell::new(&record.issue_key),
            Cell::new(&record.summary),
            Cell::new(&record.comment),
            Cell::new(format_duration(record.time_spent_seconds, false))
                .set_alignment(CellAlignment::Right),
        ];
        if is_today(record.date) {
            cells = cells.into_iter().map(|cell| cell.fg(Color::Cyan)).collect();
        }
        table.add_row(cells);
    }
    table
}

/// Per-issue totals for the JQL fallback of `get myworklog`.
pub fn issue_totals_table(rows: &[(String, String, u64)], from: NaiveDate, to: NaiveDate) -> Table {
    let period = if from == to {
        format_date(from)
    } else {
        format!("{} - {}", format_date(from), format_date(to))
    };
    let mut table = new_table(vec!["Date", "Key", "Summary", "Time Spent"]);
    for (key, summary, seconds) in rows {
        table.add_row(vec![
            Cell::new(&period),
            Cell::new(key),
            Cell::new(truncate_chars(summary, ISSUE_SUMMARY_LIMIT)),
            Cell::new(format_duration(*seconds, false)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn total_line(seconds: u64) -> String {
    format!(
        "{} {}",
        "Total time spent:".underline(),
        format_duration(seconds, false)
    )
}

pub fn stats_table(weeks: &[Week], targets: &WorkTargets) -> Table {
    let mut table = new_table(vec![
        "Week", "Start", "End", "Days", "Holidays", "Total", "Average",
    ]);
    for week in weeks {
        let days = week.work_days();
        table.add_row(vec![
            Cell::new(week.number()).set_alignment(CellAlignment::Right),
            Cell::new(format_date(week.start_date)),
            Cell::new(format_date(week.end_date)),
            target_cell(days.to_string(), f64::from(days), targets.work_days_on_target(week)),
            Cell::new(week.public_holidays).set_alignment(CellAlignment::Right),
            target_cell(
                format_hours(week.total_time()),
                week.total_time(),
                targets.total_on_target(week),
            ),
            target_cell(
                format_hours(week.average()),
                week.average(),
                targets.average_on_target(week),
            ),
        ]);
    }
    table
}

/// Accumulated balance: green when at or over target, red with the missing hours otherwise.
pub fn stats_summary(balance: f64) -> ColoredString {
    if balance >= 0.0 {
        format!("Balance: +{} hours", format_hours(balance)).green()
    } else {
        format!("Balance: -{} hours", format_hours(balance.abs())).red()
    }
}

pub fn status_line(status: &str, updated: bool) -> String {
    let label = if updated { "New status:" } else { "Current status:" };
    format!("{} {}", label.yellow().bold(), status.green())
}

pub fn transitions_list(transitions: &[Transition]) -> String {
    let mut out = String::from("The following transitions are available:\n");
    for (index, transition) in transitions.iter().enumerate() {
        out.push_str(&format!(
            "{} {}\n",
            format!("{index}.").yellow().bold(),
            transition.name
        ));
    }
    out
}

/// `{noformat}` blocks are shown as Markdown fences.
pub fn comment_for_display(body: &str) -> String {
    body.replace("{noformat}", "```")
}

/// Markdown fences typed by the user become JIRA `{noformat}` blocks.
pub fn comment_for_jira(body: &str) -> String {
    body.replace("```", "{noformat}")
}

pub fn comments_block(comments: &[Comment]) -> String {
    let mut out = String::new();
    for comment in comments {
        let author = comment.author.as_ref();
        let visibility = comment
            .visibility
            .as_ref()
            .map(|v| v.value.as_str())
            .unwrap_or("");
        out.push_str(&format!(
            "{} {:<45}Created: {}\n",
            "Comment:   ".yellow(),
            comment.id,
            comment.created.chars().take(16).collect::<String>()
        ));
        out.push_str(&format!(
            "Visibility: {:<45}Author: {} ({})\n\n",
            visibility,
            author.map(|a| a.display()).unwrap_or(""),
            author.and_then(|a| a.name.as_deref()).unwrap_or("")
        ));
        out.push_str(&comment_for_display(&comment.body));
        out.push_str("\n\n");
    }
    out
}

pub fn worklogs_table(worklogs: &[Worklog]) -> Table {
    let mut table = new_table(vec!["Started", "Author", "Time Spent", "Comment"]);
    for worklog in worklogs {
        table.add_row(vec![
            Cell::new(worklog.started.chars().take(16).collect::<String>()),
            Cell::new(worklog.author.as_ref().map(|a| a.display()).unwrap_or("")).fg(Color::Cyan),
            Cell::new(&worklog.time_spent).fg(Color::Yellow),
            Cell::new(worklog.comment.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn time_tracking_line(issue: &Issue) -> String {
    let tracking = issue.fields.timetracking.clone().unwrap_or_default();
    let estimate = tracking.original_estimate.unwrap_or_default();
    let remaining = tracking.remaining_estimate.unwrap_or_default();
    let remaining_label = if remaining == "0h" && !estimate.is_empty() {
        "Remaining:".red()
    } else {
        "Remaining:".yellow()
    };
    format!(
        "{} {:<9}{} {:<9}{} {}",
        "Total time spent:".green(),
        tracking.time_spent.unwrap_or_default(),
        "Estimated:".blue(),
        estimate,
        remaining_label,
        remaining
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_target_then_zero() {
        assert_eq!(TargetColor::classify(40.0, true), TargetColor::OnTarget);
        assert_eq!(TargetColor::classify(0.0, true), TargetColor::OnTarget);
        assert_eq!(TargetColor::classify(0.0, false), TargetColor::Zero);
        assert_eq!(TargetColor::classify(12.5, false), TargetColor::Below);
    }

    #[test]
    fn summary_shows_absolute_deficit() {
        colored::control::set_override(false);
        assert_eq!(stats_summary(2.5).to_string(), "Balance: +2.50 hours");
        assert_eq!(stats_summary(-7.25).to_string(), "Balance: -7.25 hours");
    }

    #[test]
    fn noformat_conversion_both_ways() {
        assert_eq!(comment_for_jira("```\nls\n```"), "{noformat}\nls\n{noformat}");
        assert_eq!(comment_for_display("{noformat}x{noformat}"), "```x```");
    }

    #[test]
    fn stats_table_has_a_row_per_week() {
        use crate::worklog::stats::group_by_week;
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let weeks = group_by_week(from, from + chrono::Duration::days(13), &[], &[]);
        let table = stats_table(&weeks, &WorkTargets::default());
        assert_eq!(table.row_iter().count(), 2);
        assert!(table.to_string().contains("2024-01-08"));
    }
}
