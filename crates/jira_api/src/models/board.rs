//! Agile board payloads (greenhopper rapid views and backlog data).

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RapidView {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sprint_support_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct RapidViewsResponse {
    #[serde(default)]
    pub views: Vec<RapidView>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub issues_ids: Vec<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SprintIssue {
    pub id: u64,
    pub key: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub priority_name: Option<String>,
    #[serde(default)]
    pub status_name: Option<String>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct BacklogData {
    #[serde(default)]
    pub issues: Vec<SprintIssue>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
}
