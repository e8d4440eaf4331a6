//! Error taxonomy for the command-line layer.

use std::io;

use jira_api::JiraError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Malformed user input. Always fatal for the running command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid duration '{0}', expected e.g. '1h 30m', '0.5h' or '45m'")]
    InvalidDurationFormat(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("invalid issue key '{0}'")]
    InvalidIssueKey(String),
}

#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("start time {started} of {issue_key} does not exist in the local timezone")]
    InvalidStart { issue_key: String, started: String },
    #[error(
        "failed to write worklog {worklog_id} on {issue_key} after {updated} update(s) and {created} create(s): {source}"
    )]
    Aborted {
        issue_key: String,
        worklog_id: String,
        updated: usize,
        created: usize,
        #[source]
        source: JiraError,
    },
}

/// Holiday cache problems. Reported as diagnostics, never propagated out of the loader.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not fetch public holidays: {0}")]
    Fetch(#[from] JiraError),
    #[error("could not access holiday cache {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not parse holiday cache {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
    #[error(transparent)]
    Remote(#[from] JiraError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("editor error: {0}")]
    Editor(String),
    #[error("{0}")]
    Active(String),
    #[error("{0}")]
    Usage(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
