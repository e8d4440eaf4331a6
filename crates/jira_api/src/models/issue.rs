use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "issuetype")]
    pub issue_type: Option<NamedEntity>,
    #[serde(default)]
    pub status: Option<NamedEntity>,
    #[serde(default)]
    pub priority: Option<NamedEntity>,
    #[serde(default)]
    pub project: Option<NamedEntity>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub reporter: Option<UserRef>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub timetracking: Option<TimeTracking>,
}

impl IssueFields {
    pub fn status_name(&self) -> &str {
        self.status.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map(UserRef::display)
            .unwrap_or("Unassigned")
    }
}

/// Any `{id, name}` shaped reference: status, priority, issue type, project.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NamedEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserRef {
    /// Best human readable label, falling back to the login name.
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    pub original_estimate: Option<String>,
    pub remaining_estimate: Option<String>,
    pub time_spent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssuesResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}
