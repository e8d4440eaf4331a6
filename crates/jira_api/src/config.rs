use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("jira-cli/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOLIDAY_API: &str = "https://date.nager.at/api/v3";

#[derive(Clone, Debug)]
pub struct JiraConfig {
    pub server: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl JiraConfig {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Server root without trailing slash; every REST path is appended to it.
    pub fn server_root(&self) -> &str {
        self.server.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::JiraConfig;

    #[test]
    fn server_root_drops_trailing_slashes() {
        let config = JiraConfig::new("https://jira.example.com//", "me", "secret");
        assert_eq!(config.server_root(), "https://jira.example.com");
    }
}
