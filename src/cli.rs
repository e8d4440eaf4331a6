use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("JIRA_CLI_GIT_REVISION"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "jira",
    version,
    long_version = LONG_VERSION,
    about = "Work with JIRA issues, comments and worklogs from the terminal"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "JIRA_CLI_CONFIG_DIR",
        value_name = "DIR",
        help = "Directory holding config.json, active pointers and the holiday cache"
    )]
    pub config_dir: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output (-vv for debug)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display one or many resources
    #[command(visible_alias = "g", subcommand)]
    Get(GetCommands),
    /// Set the active issue or board, or store the password
    #[command(subcommand)]
    Set(SetCommands),
    /// Clear the active issue or board
    #[command(subcommand)]
    Unset(UnsetCommands),
    /// Add worklogs and comments
    #[command(visible_alias = "a", subcommand)]
    Add(AddCommands),
    /// Edit descriptions, comments and your worklog
    #[command(visible_alias = "e", subcommand)]
    Edit(EditCommands),
    /// Change status or assignee
    #[command(visible_alias = "u", subcommand)]
    Update(UpdateCommands),
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// Display the active issue
    #[command(visible_alias = "a")]
    Active,
    /// Display all unresolved issues assigned to you
    #[command(visible_alias = "l")]
    All {
        #[arg(short, long, value_name = "JQL", help = "Use your own JQL filter")]
        filter: Option<String>,
    },
    /// Display the current status
    #[command(visible_alias = "s")]
    Status { key: Option<String> },
    /// Display available transitions
    #[command(visible_alias = "t")]
    Transitions { key: Option<String> },
    /// Display all comments
    #[command(visible_alias = "c")]
    Comments { key: Option<String> },
    /// Display the worklog of an issue
    #[command(visible_alias = "w")]
    Worklog { key: Option<String> },
    /// Display your own worklog for a date or week
    Myworklog(MyWorklogArgs),
    /// Display sprints of a board
    Sprint { board: Option<String> },
    /// Display issues on a kanban board
    Kanban { board: Option<String> },
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct MyWorklogArgs {
    #[command(subcommand)]
    pub command: Option<MyWorklogCommands>,
    #[arg(value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
    #[arg(short, long, help = "Show the whole ISO week containing the date")]
    pub week: bool,
}

#[derive(Subcommand, Debug)]
pub enum MyWorklogCommands {
    /// Weekly totals between two dates, compared with your targets
    Stats {
        #[arg(value_name = "FROM")]
        from: String,
        #[arg(value_name = "TO")]
        to: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetCommands {
    /// Make an issue the default for issue commands
    Issue { key: String },
    /// Make a board the default for sprint and kanban commands
    Board { name: String },
    /// Store the password in the OS keyring (read from stdin)
    Password,
}

#[derive(Subcommand, Debug)]
pub enum UnsetCommands {
    Issue,
    Board,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Log work on an issue
    #[command(visible_alias = "w")]
    Work {
        #[arg(num_args = 1..=2, required = true, value_names = ["KEY", "TIME"])]
        args: Vec<String>,
        #[arg(short, long, value_name = "YYYY-MM-DD", help = "Date of the work, defaults to today")]
        date: Option<String>,
        #[arg(short, long, value_name = "HH:MM", help = "Start time, defaults to now")]
        time: Option<String>,
        #[arg(short, long, help = "Worklog comment")]
        comment: Option<String>,
    },
    /// Write a new comment in your editor
    #[command(visible_alias = "c")]
    Comment { key: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Edit the issue description
    #[command(visible_alias = "d")]
    Description { key: Option<String> },
    /// Edit a comment, the latest one unless an id is given
    #[command(visible_alias = "c")]
    Comment {
        #[arg(num_args = 0..=2, value_names = ["KEY", "ID"])]
        args: Vec<String>,
    },
    /// Edit your worklog for a date
    Myworklog {
        #[arg(value_name = "YYYY-MM-DD")]
        date: Option<String>,
        #[arg(long, help = "Also load today's entries; kept lines move to the date")]
        merge_today: bool,
        #[arg(long, value_name = "USER", help = "Add USER's entries for the date as new lines")]
        adopt: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UpdateCommands {
    /// Move the issue through a transition
    #[command(visible_alias = "s")]
    Status { key: Option<String> },
    /// Assign the issue (`me`, a username, or -1 for automatic)
    #[command(visible_alias = "a")]
    Assignee {
        #[arg(num_args = 1..=2, required = true, value_names = ["KEY", "USER"], allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn myworklog_stats_is_a_subcommand() {
        let cli = Cli::try_parse_from(["jira", "get", "myworklog", "stats", "2024-01-01", "2024-02-01"]).unwrap();
        match cli.command {
            Commands::Get(GetCommands::Myworklog(args)) => {
                assert!(args.date.is_none());
                assert!(matches!(
                    args.command,
                    Some(MyWorklogCommands::Stats { ref from, ref to }) if from == "2024-01-01" && to == "2024-02-01"
                ));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn myworklog_accepts_date_and_week_flag() {
        let cli = Cli::try_parse_from(["jira", "g", "myworklog", "2024-01-03", "-w"]).unwrap();
        match cli.command {
            Commands::Get(GetCommands::Myworklog(args)) => {
                assert_eq!(args.date.as_deref(), Some("2024-01-03"));
                assert!(args.week);
                assert!(args.command.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_work_takes_optional_key() {
        let cli = Cli::try_parse_from(["jira", "add", "work", "1h 30m", "-c", "review"]).unwrap();
        match cli.command {
            Commands::Add(AddCommands::Work { args, comment, .. }) => {
                assert_eq!(args, vec!["1h 30m"]);
                assert_eq!(comment.as_deref(), Some("review"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["jira", "add", "work"]).is_err());
    }

    #[test]
    fn assignee_accepts_automatic() {
        let cli = Cli::try_parse_from(["jira", "update", "assignee", "ABC-1", "-1"]).unwrap();
        match cli.command {
            Commands::Update(UpdateCommands::Assignee { args }) => {
                assert_eq!(args, vec!["ABC-1", "-1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
