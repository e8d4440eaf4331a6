use std::collections::HashSet;

use chrono::NaiveDate;
use jira_api::{Issue, JiraClient};
use log::{debug, info};
use regex::Regex;

use super::resolve_board;
use crate::active::Pointer;
use crate::cli::{GetCommands, MyWorklogArgs, MyWorklogCommands};
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::render;
use crate::worklog::dates::{date_or_today, format_date, iso_week_bounds, parse_date};
use crate::worklog::holidays::{holiday_dates, load_range};
use crate::worklog::stats::{group_by_week, WorkTargets};
use crate::worklog::timesheet::normalize;

const DEFAULT_JQL: &str = "assignee = currentUser() AND resolution = Unresolved";
const ISSUE_ORDER: &str = "ORDER BY priority DESC, updated DESC";
const MAX_RESULTS: u32 = 100;

pub async fn run(ctx: &AppContext, command: GetCommands) -> Result<()> {
    match command {
        GetCommands::Myworklog(args) => my_worklog(ctx, args).await,
        GetCommands::Active => {
            let key = ctx.active.require(Pointer::Issue)?;
            let issue = ctx.client()?.get_issue(&key).await?;
            println!("Active issue: {} {}", issue.key, issue.fields.summary);
            Ok(())
        }
        other => issue_command(ctx, other).await,
    }
}

async fn issue_command(ctx: &AppContext, command: GetCommands) -> Result<()> {
    let client = ctx.client()?;
    match command {
        GetCommands::All { filter } => {
            let jql = issue_query(filter.as_deref());
            debug!("searching with {jql}");
            let issues = client.search_issues(&jql, MAX_RESULTS).await?;
            println!("{}", render::issues_table(&issues));
        }
        GetCommands::Status { key } => {
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let issue = client.get_issue(&key).await?;
            println!("{}", render::status_line(issue.fields.status_name(), false));
        }
        GetCommands::Transitions { key } => {
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let issue = client.get_issue(&key).await?;
            println!("{}\n", render::status_line(issue.fields.status_name(), false));
            let transitions = client.get_transitions(&key).await?;
            print!("{}", render::transitions_list(&transitions));
        }
        GetCommands::Comments { key } => {
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let comments = client.get_comments(&key).await?;
            if comments.is_empty() {
                println!("{key} has no comments");
            } else {
                print!("{}", render::comments_block(&comments));
            }
        }
        GetCommands::Worklog { key } => {
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let worklogs = client.get_worklogs(&key).await?;
            if worklogs.iter().all(|w| w.time_spent_seconds == 0) {
                println!("No work has been logged on this issue");
            } else {
                println!("{}", render::worklogs_table(&worklogs));
                let issue = client.get_issue(&key).await?;
                println!("{}", render::time_tracking_line(&issue));
            }
        }
        GetCommands::Sprint { board } => sprints(ctx, &client, board.as_deref()).await?,
        GetCommands::Kanban { board } => {
            let view = resolve_board(ctx, &client, board.as_deref()).await?;
            let issues = client.get_board_issues(view.id).await?;
            println!("{}", view.name);
            println!("{}", render::issues_table(&issues));
        }
        GetCommands::Active | GetCommands::Myworklog(_) => {}
    }
    Ok(())
}

fn issue_query(filter: Option<&str>) -> String {
    let base = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_JQL);
    format!("{base} {ISSUE_ORDER}")
}

async fn my_worklog(ctx: &AppContext, args: MyWorklogArgs) -> Result<()> {
    if let Some(MyWorklogCommands::Stats { from, to }) = args.command {
        return stats(ctx, &from, &to).await;
    }

    let date = date_or_today(args.date.as_deref())?;
    let (from, to) = if args.week {
        iso_week_bounds(date)
    } else {
        (date, date)
    };
    let client = ctx.client()?;

    if !ctx.config.use_timesheet_plugin {
        return my_worklog_from_search(ctx, &client, from, to).await;
    }

    let raw = client
        .get_timesheet(&format_date(from), &format_date(to), None)
        .await?;
    let records = normalize(&raw, true);
    if records.is_empty() {
        println!("You have not logged any hours in this period");
        return Ok(());
    }
    let total: u64 = records.iter().map(|r| r.time_spent_seconds).sum();
    println!("{}", render::my_worklog_table(&records));
    println!("{}", render::total_line(total));
    Ok(())
}

/// Without the timesheet plugin: find issues by JQL and sum my worklogs on each.
async fn my_worklog_from_search(
    ctx: &AppContext,
    client: &JiraClient,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    let (from_text, to_text) = (format_date(from), format_date(to));
    let jql = format!(
        "worklogDate >= \"{from_text}\" AND worklogDate <= \"{to_text}\" AND worklogAuthor = currentUser()"
    );
    let issues = client.search_issues(&jql, MAX_RESULTS).await?;

    let mut rows = Vec::new();
    for issue in &issues {
        let seconds = my_seconds_on_issue(ctx, client, issue, &from_text, &to_text).await?;
        rows.push((issue.key.clone(), issue.fields.summary.clone(), seconds));
    }
    if rows.is_empty() {
        println!("You have not logged any hours in this period");
        return Ok(());
    }
    let total: u64 = rows.iter().map(|(_, _, seconds)| seconds).sum();
    println!("{}", render::issue_totals_table(&rows, from, to));
    println!("{}", render::total_line(total));
    Ok(())
}

async fn my_seconds_on_issue(
    ctx: &AppContext,
    client: &JiraClient,
    issue: &Issue,
    from: &str,
    to: &str,
) -> Result<u64> {
    let worklogs = client.get_worklogs(&issue.key).await?;
    Ok(worklogs
        .iter()
        .filter(|w| {
            w.author.as_ref().and_then(|a| a.name.as_deref()) == Some(ctx.config.username.as_str())
        })
        .filter(|w| {
            let day = w.started.get(..10).unwrap_or("");
            day >= from && day <= to
        })
        .map(|w| w.time_spent_seconds)
        .sum())
}

async fn stats(ctx: &AppContext, from: &str, to: &str) -> Result<()> {
    let (from, _) = iso_week_bounds(parse_date(from)?);
    let (_, to) = iso_week_bounds(parse_date(to)?);
    if from > to {
        return Err(CliError::Usage(format!(
            "start {} is after end {}",
            format_date(from),
            format_date(to)
        )));
    }
    let client = ctx.client()?;
    let raw = client
        .get_timesheet(&format_date(from), &format_date(to), None)
        .await?;
    let records = normalize(&raw, false);
    info!("{} worklogs between {} and {}", records.len(), from, to);

    let holidays = match ctx.config.country_code.as_deref() {
        Some(country) => {
            let service = ctx.holiday_service()?;
            load_range(&service, ctx.config_dir(), country, from, to).await
        }
        None => Vec::new(),
    };

    let weeks = group_by_week(from, to, &records, &holiday_dates(&holidays));
    let targets = WorkTargets::from_config(&ctx.config);
    println!("{}", render::stats_table(&weeks, &targets));
    println!("{}", render::stats_summary(targets.total_balance(&weeks)));
    Ok(())
}

async fn sprints(ctx: &AppContext, client: &JiraClient, board: Option<&str>) -> Result<()> {
    let view = resolve_board(ctx, client, board).await?;
    if !view.sprint_support_enabled {
        return Err(CliError::Usage(format!(
            "board '{}' has no sprints, try `jira get kanban`",
            view.name
        )));
    }
    let filter = sprint_filter(ctx.config.sprint_filter.as_deref())?;
    let backlog = client.get_backlog(view.id).await?;

    for sprint in backlog
        .sprints
        .iter()
        .filter(|s| filter.as_ref().map_or(true, |re| re.is_match(&s.name)))
    {
        let ids: HashSet<u64> = sprint.issues_ids.iter().copied().collect();
        let issues: Vec<_> = backlog
            .issues
            .iter()
            .filter(|issue| ids.contains(&issue.id) && !issue.hidden)
            .collect();
        println!("{} ({})", sprint.name, sprint.state);
        println!("{}", render::sprint_issues_table(&issues));
    }
    Ok(())
}

fn sprint_filter(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            Regex::new(p).map_err(|err| CliError::Config(format!("invalid sprint_filter: {err}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_ordered() {
        assert_eq!(
            issue_query(None),
            "assignee = currentUser() AND resolution = Unresolved ORDER BY priority DESC, updated DESC"
        );
        assert_eq!(
            issue_query(Some("project = OPS")),
            "project = OPS ORDER BY priority DESC, updated DESC"
        );
    }

    #[test]
    fn sprint_filter_is_optional_and_validated() {
        assert!(sprint_filter(None).unwrap().is_none());
        assert!(sprint_filter(Some("^Team A")).unwrap().unwrap().is_match("Team A 12"));
        assert!(matches!(sprint_filter(Some("(")), Err(CliError::Config(_))));
    }
}
