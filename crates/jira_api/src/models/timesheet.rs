//! Raw timesheet gadget payloads (`/rest/timesheet-gadget/1.0/raw-timesheet.json`).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TimesheetResponse {
    #[serde(default)]
    pub worklog: Vec<TimesheetIssue>,
}

/// One issue the user logged time on, with the individual entries.
#[derive(Debug, Deserialize, Clone)]
pub struct TimesheetIssue {
    pub key: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub entries: Vec<TimesheetEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub id: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_full_name: String,
    /// Epoch milliseconds.
    pub start_date: i64,
    /// Seconds.
    pub time_spent: u64,
    #[serde(default)]
    pub comment: Option<String>,
}
