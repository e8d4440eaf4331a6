//! Worklog pipeline: timesheet normalization, the editable text block,
//! reconciliation against the server and weekly statistics.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

pub mod dates;
pub mod duration;
pub mod edit_parser;
pub mod holidays;
pub mod reconcile;
pub mod stats;
pub mod timesheet;

/// Server identity of a worklog. `New` lines in the edit block have none yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorklogId {
    Existing(u64),
    New,
}

impl fmt::Display for WorklogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorklogId::Existing(id) => write!(f, "{id}"),
            WorklogId::New => f.write_str("new"),
        }
    }
}

/// One worklog as the pipeline sees it. `started` is local wall-clock time at minute precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogRecord {
    pub id: WorklogId,
    pub date: NaiveDate,
    pub started: NaiveDateTime,
    pub issue_key: String,
    pub summary: String,
    pub comment: String,
    pub time_spent_seconds: u64,
}

impl WorklogRecord {
    /// Copy of the record moved onto `date`, keeping the time of day.
    pub fn moved_to(&self, date: NaiveDate) -> Self {
        Self {
            date,
            started: date.and_time(self.started.time()),
            ..self.clone()
        }
    }
}
