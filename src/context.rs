//! Per-invocation state shared by every command handler.

use std::path::{Path, PathBuf};

use jira_api::{HolidayService, JiraClient, JiraConfig};
use log::debug;

use crate::active::{ActiveStore, Pointer};
use crate::config::{Config, ConfigManager};
use crate::error::{CliError, ParseError, Result};
use crate::secrets::SecretsManager;
use crate::worklog::edit_parser::is_valid_issue_key;

pub struct AppContext {
    pub config: Config,
    pub config_manager: ConfigManager,
    pub active: ActiveStore,
    pub secrets: SecretsManager,
}

impl AppContext {
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_manager = ConfigManager::new(config_dir)?;
        let config = config_manager.load()?;
        debug!("loaded configuration from {}", config_manager.path().display());
        let active = ActiveStore::new(config_manager.dir());
        Ok(Self {
            config,
            config_manager,
            active,
            secrets: SecretsManager::default(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        self.config_manager.dir()
    }

    /// Builds an authenticated client; only remote commands need a server and password.
    pub fn client(&self) -> Result<JiraClient> {
        let server = self.config.require_server()?;
        let password = self.secrets.resolve_password(&self.config)?;
        let config = JiraConfig::new(server, self.config.username.clone(), password);
        Ok(JiraClient::new(config)?)
    }

    pub fn holiday_service(&self) -> Result<HolidayService> {
        Ok(HolidayService::new(self.config.holiday_api_url.clone())?)
    }

    /// Alias lookup, upper-casing and format check for a user supplied key.
    pub fn normalize_issue_key(&self, raw: &str) -> Result<String> {
        let key = self
            .config
            .resolve_alias(raw)
            .unwrap_or(raw)
            .trim()
            .to_uppercase();
        if is_valid_issue_key(&key) {
            Ok(key)
        } else {
            Err(ParseError::InvalidIssueKey(raw.to_string()).into())
        }
    }

    /// Explicit keys are checked remotely; otherwise the active issue is used.
    pub async fn resolve_issue_key(&self, client: &JiraClient, raw: Option<&str>) -> Result<String> {
        match raw {
            Some(raw) => {
                let key = self.normalize_issue_key(raw)?;
                if client.issue_exists(&key).await? {
                    Ok(key)
                } else {
                    Err(CliError::Usage(format!("issue {key} does not exist")))
                }
            }
            None => {
                let active = self.active.require(Pointer::Issue)?;
                self.normalize_issue_key(&active)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(dir: &Path) -> AppContext {
        std::fs::write(
            dir.join("config.json"),
            r#"{"aliases":{"standup":"ops-12"}}"#,
        )
        .unwrap();
        AppContext::load(Some(dir.to_path_buf())).unwrap()
    }

    #[test]
    fn normalizes_aliases_and_case() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.normalize_issue_key("abc-12").unwrap(), "ABC-12");
        assert_eq!(ctx.normalize_issue_key("StandUp").unwrap(), "OPS-12");
        assert!(matches!(
            ctx.normalize_issue_key("nope"),
            Err(CliError::Parse(ParseError::InvalidIssueKey(_)))
        ));
    }

    #[test]
    fn remote_commands_need_a_server() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert!(matches!(ctx.client(), Err(CliError::Config(_))));
    }
}
