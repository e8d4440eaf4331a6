use chrono::NaiveDate;
use jira_api::JiraClient;
use log::{debug, info};

use crate::cli::EditCommands;
use crate::context::AppContext;
use crate::editor::Editor;
use crate::error::{CliError, Result};
use crate::render::{comment_for_display, comment_for_jira};
use crate::worklog::dates::{date_or_today, format_date, today};
use crate::worklog::edit_parser::{parse_edited_block, render_edit_block};
use crate::worklog::reconcile::{apply, reconcile};
use crate::worklog::timesheet::normalize;
use crate::worklog::{WorklogId, WorklogRecord};

pub async fn run(ctx: &AppContext, command: EditCommands) -> Result<()> {
    match command {
        EditCommands::Description { key } => {
            let client = ctx.client()?;
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let issue = client.get_issue(&key).await?;
            let current = issue.fields.description.unwrap_or_default();
            match Editor::from_env()?.capture(&comment_for_display(&current), "description-")? {
                Some(edited) => {
                    client
                        .update_description(&key, &comment_for_jira(edited.trim_end()))
                        .await?;
                    println!("Successfully saved new description");
                }
                None => println!("No changes"),
            }
        }
        EditCommands::Comment { args } => edit_comment(ctx, &args).await?,
        EditCommands::Myworklog {
            date,
            merge_today,
            adopt,
        } => {
            let date = date_or_today(date.as_deref())?;
            edit_my_worklog(ctx, date, merge_today, adopt.as_deref()).await?;
        }
    }
    Ok(())
}

/// `[KEY] [ID]`; a lone all-digit argument is a comment id on the active issue.
fn split_comment_args(args: &[String]) -> (Option<&str>, Option<&str>) {
    match args {
        [] => (None, None),
        [one] if one.chars().all(|c| c.is_ascii_digit()) => (None, Some(one.as_str())),
        [one] => (Some(one.as_str()), None),
        [key, id, ..] => (Some(key.as_str()), Some(id.as_str())),
    }
}

async fn edit_comment(ctx: &AppContext, args: &[String]) -> Result<()> {
    let (key, id) = split_comment_args(args);
    let client = ctx.client()?;
    let key = ctx.resolve_issue_key(&client, key).await?;
    let comments = client.get_comments(&key).await?;

    let comment = match id {
        Some(id) => comments
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CliError::Usage(format!("comment {id} does not exist on {key}")))?,
        None => comments.last().ok_or_else(|| {
            CliError::Usage(format!(
                "{key} does not have any comments, try `jira add comment`"
            ))
        })?,
    };

    match Editor::from_env()?.capture(&comment_for_display(&comment.body), "comment-")? {
        Some(edited) => {
            client
                .update_comment(
                    &key,
                    &comment.id,
                    &comment_for_jira(edited.trim_end()),
                    ctx.config.comment_visibility.as_deref(),
                )
                .await?;
            println!("Successfully saved comment {}", comment.id);
        }
        None => println!("No changes"),
    }
    Ok(())
}

async fn timesheet_for(
    client: &JiraClient,
    date: NaiveDate,
    target_user: Option<&str>,
) -> Result<Vec<WorklogRecord>> {
    let day = format_date(date);
    let raw = client.get_timesheet(&day, &day, target_user).await?;
    Ok(normalize(&raw, false))
}

/// Records for the edit block: the date's own worklogs (plus today's when merging)
/// and, when adopting, another user's entries as new lines.
fn edit_block_records(
    date: NaiveDate,
    mut original: Vec<WorklogRecord>,
    adopted: Vec<WorklogRecord>,
) -> (Vec<WorklogRecord>, Vec<WorklogRecord>) {
    original.sort_by_key(|record| record.started);
    let mut shown = original.clone();
    shown.extend(adopted.into_iter().map(|record| WorklogRecord {
        id: WorklogId::New,
        ..record.moved_to(date)
    }));
    (original, shown)
}

async fn edit_my_worklog(
    ctx: &AppContext,
    date: NaiveDate,
    merge_today: bool,
    adopt: Option<&str>,
) -> Result<()> {
    if !ctx.config.use_timesheet_plugin {
        return Err(CliError::Usage(
            "editing the worklog is only supported with the timesheet plugin enabled".into(),
        ));
    }
    let client = ctx.client()?;

    let mut original = timesheet_for(&client, date, None).await?;
    if merge_today && date != today() {
        original.extend(timesheet_for(&client, today(), None).await?);
    }
    let adopted = match adopt {
        Some(user) => timesheet_for(&client, date, Some(user)).await?,
        None => Vec::new(),
    };
    let (original, shown) = edit_block_records(date, original, adopted);
    if shown.is_empty() {
        println!("There is nothing to edit.");
        return Ok(());
    }

    let block = render_edit_block(date, &shown);
    let Some(edited) = Editor::from_env()?.capture(&block, "edit-worklog-")? else {
        println!("No changes");
        return Ok(());
    };
    let edited = parse_edited_block(date, edited.as_bytes());
    debug!("parsed {} worklog lines", edited.len());

    let plan = reconcile(&original, &edited);
    if plan.is_empty() {
        println!("No changes");
        return Ok(());
    }
    info!(
        "applying {} update(s) and {} create(s)",
        plan.updates.len(),
        plan.creates.len()
    );
    let report = apply(&client, &plan).await?;
    if report.updated > 0 {
        println!("Successfully updated {} worklog entries", report.updated);
    }
    if report.created > 0 {
        println!("Successfully added {} worklog entries", report.created);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, date: NaiveDate, hour: u32) -> WorklogRecord {
        WorklogRecord {
            id: WorklogId::Existing(id),
            date,
            started: date.and_hms_opt(hour, 0, 0).unwrap(),
            issue_key: "ABC-1".to_string(),
            summary: "Summary".to_string(),
            comment: "work".to_string(),
            time_spent_seconds: 3600,
        }
    }

    #[test]
    fn comment_args_split() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(split_comment_args(&args(&[])), (None, None));
        assert_eq!(split_comment_args(&args(&["123456"])), (None, Some("123456")));
        assert_eq!(split_comment_args(&args(&["abc-1"])), (Some("abc-1"), None));
        assert_eq!(
            split_comment_args(&args(&["ABC-1", "42"])),
            (Some("ABC-1"), Some("42"))
        );
    }

    #[test]
    fn merged_today_lines_move_onto_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let (original, shown) =
            edit_block_records(date, vec![record(1, date, 9), record(2, other_day, 8)], vec![]);

        let block = render_edit_block(date, &shown);
        let edited = parse_edited_block(date, block.as_bytes());
        let plan = reconcile(&original, &edited);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, WorklogId::Existing(2));
        assert_eq!(plan.updates[0].started, date.and_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn adopted_entries_become_creates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let (original, shown) = edit_block_records(date, vec![], vec![record(77, date, 10)]);

        assert!(original.is_empty());
        assert_eq!(shown[0].id, WorklogId::New);
        let edited = parse_edited_block(date, render_edit_block(date, &shown).as_bytes());
        let plan = reconcile(&original, &edited);
        assert_eq!(plan.creates.len(), 1);
        assert!(plan.updates.is_empty());
    }
}
