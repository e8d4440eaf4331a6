//! Command handlers, one module per top-level verb.

use std::io::{self, BufRead, Write};

use jira_api::{JiraClient, RapidView};

use crate::active::Pointer;
use crate::cli::Commands;
use crate::context::AppContext;
use crate::error::{CliError, Result};

mod add;
mod edit;
mod get;
mod set;
mod update;

pub async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Get(command) => get::run(ctx, command).await,
        Commands::Set(command) => set::run_set(ctx, command).await,
        Commands::Unset(command) => set::run_unset(ctx, command),
        Commands::Add(command) => add::run(ctx, command).await,
        Commands::Edit(command) => edit::run(ctx, command).await,
        Commands::Update(command) => update::run(ctx, command).await,
    }
}

/// Finds a board by numeric id or case-insensitive name, defaulting to the active board.
pub(crate) async fn resolve_board(
    ctx: &AppContext,
    client: &JiraClient,
    raw: Option<&str>,
) -> Result<RapidView> {
    let wanted = match raw {
        Some(name) => name.trim().to_string(),
        None => ctx.active.require(Pointer::Board)?,
    };
    let views = client.get_rapid_views().await?;
    find_board(views, &wanted).ok_or_else(|| CliError::Usage(format!("board '{wanted}' not found")))
}

fn find_board(views: Vec<RapidView>, wanted: &str) -> Option<RapidView> {
    let id = wanted.parse::<u64>().ok();
    let lowered = wanted.to_lowercase();
    views
        .into_iter()
        .find(|view| Some(view.id) == id || view.name.to_lowercase() == lowered)
}

/// Reads one trimmed line from stdin after printing `prompt`.
pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
