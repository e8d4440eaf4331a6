use crate::models::UserRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub started: String,
    #[serde(default)]
    pub time_spent: String,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct WorklogsResponse {
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

/// Body for both worklog create (POST) and update (PUT); `id` is only sent on update.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub comment: String,
    pub started: String,
    pub time_spent_seconds: u64,
}
