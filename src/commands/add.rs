use chrono::{Local, Timelike};
use log::debug;

use crate::cli::AddCommands;
use crate::context::AppContext;
use crate::editor::Editor;
use crate::error::{CliError, Result};
use crate::render::comment_for_jira;
use crate::worklog::dates::{date_or_today, parse_time};
use crate::worklog::duration::{format_duration, parse_duration};
use crate::worklog::reconcile::worklog_payload;
use crate::worklog::{WorklogId, WorklogRecord};

const DEFAULT_WORK_COMMENT: &str = "Worklog added by jira-cli";

pub async fn run(ctx: &AppContext, command: AddCommands) -> Result<()> {
    match command {
        AddCommands::Work {
            args,
            date,
            time,
            comment,
        } => {
            let (key, duration) = split_key_and_value(&args)?;
            let seconds = parse_duration(duration)?;
            let date = date_or_today(date.as_deref())?;
            let start = match time.as_deref() {
                Some(text) => parse_time(text)?,
                None => {
                    let now = Local::now().time();
                    now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now)
                }
            };

            let client = ctx.client()?;
            let key = ctx.resolve_issue_key(&client, key).await?;
            let record = WorklogRecord {
                id: WorklogId::New,
                date,
                started: date.and_time(start),
                issue_key: key.clone(),
                summary: String::new(),
                comment: comment
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_WORK_COMMENT.to_string()),
                time_spent_seconds: seconds,
            };
            let payload = worklog_payload(&record)?;
            debug!("adding worklog {payload:?}");
            client.add_worklog(&key, &payload).await?;
            println!(
                "Logged {} on {key} at {}",
                format_duration(seconds, false),
                record.started.format("%Y-%m-%d %H:%M")
            );
        }
        AddCommands::Comment { key } => {
            let client = ctx.client()?;
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let Some(text) = Editor::from_env()?.capture("", "comment-")? else {
                println!("No comment added");
                return Ok(());
            };
            if text.trim().is_empty() {
                println!("No comment added");
                return Ok(());
            }
            client
                .add_comment(
                    &key,
                    &comment_for_jira(text.trim_end()),
                    ctx.config.comment_visibility.as_deref(),
                )
                .await?;
            println!("Comment added to {key}");
        }
    }
    Ok(())
}

/// `[KEY] VALUE` positional pairs: the last value is required, the key optional.
pub(crate) fn split_key_and_value(args: &[String]) -> Result<(Option<&str>, &str)> {
    match args {
        [value] => Ok((None, value.as_str())),
        [key, value] => Ok((Some(key.as_str()), value.as_str())),
        _ => Err(CliError::Usage("expected [KEY] followed by a value".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_optional() {
        let one = vec!["2h".to_string()];
        let two = vec!["ABC-1".to_string(), "2h".to_string()];
        assert_eq!(split_key_and_value(&one).unwrap(), (None, "2h"));
        assert_eq!(split_key_and_value(&two).unwrap(), (Some("ABC-1"), "2h"));
        assert!(split_key_and_value(&[]).is_err());
    }
}
