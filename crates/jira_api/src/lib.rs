//! Typed JIRA REST client crate used by the jira-cli binary.

pub mod client;
pub mod config;
pub mod error;
pub mod holidays;
pub mod models;

pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{JiraError, Result};
pub use holidays::HolidayService;
pub use models::{
    BacklogData, Comment, Issue, IssueFields, NamedEntity, RapidView, Sprint, SprintIssue,
    TimeTracking, TimesheetEntry, TimesheetIssue, Transition, UserRef, Visibility, Worklog,
    WorklogPayload,
};
