//! Runs the user's editor on a temporary file and reads the result back.

use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

use log::debug;

use crate::error::{CliError, Result};

const DEFAULT_EDITOR: &str = "vim";

pub struct Editor {
    command: Vec<String>,
}

impl Editor {
    /// `$EDITOR`, falling back to vim.
    pub fn from_env() -> Result<Self> {
        let raw = env::var("EDITOR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self::new(&raw)
    }

    pub fn new(raw: &str) -> Result<Self> {
        let command = shell_words::split(raw)
            .map_err(|err| CliError::Editor(format!("cannot parse editor command '{raw}': {err}")))?;
        if command.is_empty() {
            return Err(CliError::Editor("editor command is empty".to_string()));
        }
        Ok(Self { command })
    }

    /// Opens `initial` in the editor. `None` means the file was left untouched.
    pub fn capture(&self, initial: &str, prefix: &str) -> Result<Option<String>> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".txt")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;
        let path = file.path().to_path_buf();
        let before = fs::metadata(&path)?.modified()?;

        let program = which::which(&self.command[0]).map_err(|err| {
            CliError::Editor(format!("editor '{}' not found: {err}", self.command[0]))
        })?;
        debug!("launching {} on {}", program.display(), path.display());
        let status = Command::new(program)
            .args(&self.command[1..])
            .arg(&path)
            .status()
            .map_err(|err| CliError::Editor(format!("failed to start editor: {err}")))?;
        if !status.success() {
            return Err(CliError::Editor(format!("editor exited with {status}")));
        }

        let after = fs::metadata(&path)?.modified()?;
        let content = fs::read_to_string(&path)?;
        if after == before && content == initial {
            return Ok(None);
        }
        Ok(Some(content))
    }
}
