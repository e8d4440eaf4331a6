use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use keyring::{Entry, Error as KeyringError};
use log::{debug, warn};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::{Config, PasswordType};
use crate::error::{CliError, Result};

const KEYRING_SERVICE: &str = "jira-cli";

/// Turns the configured password into the secret sent to the server.
#[derive(Clone)]
pub struct SecretsManager {
    keyring_service: String,
}

impl Default for SecretsManager {
    fn default() -> Self {
        Self {
            keyring_service: KEYRING_SERVICE.to_string(),
        }
    }
}

impl SecretsManager {
    pub fn resolve_password(&self, config: &Config) -> Result<String> {
        match config.password_type {
            PasswordType::Plain => {
                if config.password.is_empty() {
                    return Err(CliError::Credential(
                        "no password configured, set one in config.json or run `jira set password`"
                            .to_string(),
                    ));
                }
                warn!("password is stored in plain text, consider password_type \"keyring\"");
                Ok(config.password.clone())
            }
            PasswordType::Pass => pass_password(&config.password),
            PasswordType::Gpg => gpg_password(&config.password),
            PasswordType::Keyring => self.load_password(&config.username),
        }
    }

    pub fn store_password(&self, username: &str, password: &str) -> Result<()> {
        let trimmed = password.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(CliError::Credential("password must not be empty".into()));
        }
        self.entry(username)?
            .set_password(trimmed)
            .map_err(|err| CliError::Credential(format!("failed to store password in keyring: {err}")))
    }

    fn load_password(&self, username: &str) -> Result<String> {
        match self.entry(username)?.get_password() {
            Ok(secret) => Ok(secret),
            Err(KeyringError::NoEntry) => Err(CliError::Credential(format!(
                "no keyring password for {username}, run `jira set password`"
            ))),
            Err(err) => Err(CliError::Credential(format!(
                "failed to read password from keyring: {err}"
            ))),
        }
    }

    fn entry(&self, username: &str) -> Result<Entry> {
        if username.trim().is_empty() {
            return Err(CliError::Credential(
                "username must be set in config.json to use the keyring".into(),
            ));
        }
        Entry::new(&self.keyring_service, username)
            .map_err(|err| CliError::Credential(format!("failed to open keyring entry: {err}")))
    }
}

/// First line of `pass <entry>`.
fn pass_password(entry: &str) -> Result<String> {
    debug!("reading password from pass entry {entry}");
    let output = Command::new("pass")
        .arg(entry)
        .output()
        .map_err(|err| CliError::Credential(format!("failed to run pass: {err}")))?;
    if !output.status.success() {
        return Err(CliError::Credential(format!(
            "pass exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    first_line(&output.stdout)
}

/// `armored` is the base64 encoded output of `gpg --encrypt --armor`.
fn gpg_password(armored: &str) -> Result<String> {
    let encrypted = decode_armored(armored)?;
    let mut child = Command::new("gpg")
        .args(["--quiet", "--decrypt"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| CliError::Credential(format!("failed to run gpg: {err}")))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&encrypted)?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(CliError::Credential(format!(
            "gpg could not decrypt the password: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    first_line(&output.stdout)
}

fn decode_armored(armored: &str) -> Result<Vec<u8>> {
    let compact: String = armored.split_whitespace().collect();
    BASE64_STANDARD
        .decode(compact)
        .map_err(|err| CliError::Credential(format!("password is not valid base64: {err}")))
}

fn first_line(bytes: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(bytes);
    text.lines()
        .next()
        .map(str::to_string)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| CliError::Credential("password output was empty".into()))
}
