use jira_api::Transition;

use super::add::split_key_and_value;
use super::prompt_line;
use crate::cli::UpdateCommands;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::render;

pub async fn run(ctx: &AppContext, command: UpdateCommands) -> Result<()> {
    let client = ctx.client()?;
    match command {
        UpdateCommands::Status { key } => {
            let key = ctx.resolve_issue_key(&client, key.as_deref()).await?;
            let issue = client.get_issue(&key).await?;
            println!("{}\n", render::status_line(issue.fields.status_name(), false));

            let transitions = client.get_transitions(&key).await?;
            if transitions.is_empty() {
                return Err(CliError::Usage(format!("{key} has no available transitions")));
            }
            print!("{}", render::transitions_list(&transitions));
            let answer = prompt_line("Select transition: ")?;
            let transition = pick_transition(&transitions, &answer)?;

            client.execute_transition(&key, &transition.id).await?;
            let issue = client.get_issue(&key).await?;
            println!("{}", render::status_line(issue.fields.status_name(), true));
        }
        UpdateCommands::Assignee { args } => {
            let (key, user) = split_key_and_value(&args)?;
            let key = ctx.resolve_issue_key(&client, key).await?;
            let assignee = assignee_name(user, &ctx.config.username);
            client.assign_issue(&key, assignee).await?;
            println!("{key} assigned to {assignee}");
        }
    }
    Ok(())
}

fn pick_transition<'a>(transitions: &'a [Transition], answer: &str) -> Result<&'a Transition> {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|index| transitions.get(index))
        .ok_or_else(|| CliError::Usage(format!("'{answer}' is not a listed transition")))
}

/// `me` is the configured user; anything else, including `-1`, goes through as is.
fn assignee_name<'a>(user: &'a str, me: &'a str) -> &'a str {
    if user.eq_ignore_ascii_case("me") {
        me
    } else {
        user
    }
}
