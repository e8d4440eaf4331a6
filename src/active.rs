//! Active issue and board pointers, one small file each in the config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{CliError, Result};

/// Which default argument a pointer file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Issue,
    Board,
}

impl Pointer {
    fn file_name(self) -> &'static str {
        match self {
            Pointer::Issue => "issue",
            Pointer::Board => "board",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Pointer::Issue => "active issue",
            Pointer::Board => "active board",
        }
    }
}

/// File-backed store for the active issue and board.
#[derive(Clone, Debug)]
pub struct ActiveStore {
    dir: PathBuf,
}

impl ActiveStore {
    /// Creates a store rooted at `dir`; nothing is touched until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, pointer: Pointer) -> PathBuf {
        self.dir.join(pointer.file_name())
    }

    /// Reads the trimmed pointer value, `None` when the file is missing or blank.
    pub fn get(&self, pointer: Pointer) -> Result<Option<String>> {
        match fs::read_to_string(self.path(pointer)) {
            Ok(content) => {
                let value = content.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`get`](Self::get) but an unset pointer is an error.
    pub fn require(&self, pointer: Pointer) -> Result<String> {
        self.get(pointer)?.ok_or_else(|| {
            CliError::Active(format!(
                "no {} set, pass one explicitly or run `jira set {}`",
                pointer.label(),
                pointer.file_name()
            ))
        })
    }

    /// Persists `value`, creating the config directory if needed.
    pub fn set(&self, pointer: Pointer, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(pointer), value.trim())?;
        Ok(())
    }

    /// Returns whether a pointer was actually removed.
    pub fn clear(&self, pointer: Pointer) -> Result<bool> {
        match fs::remove_file(self.path(pointer)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = ActiveStore::new(dir.path().join("cfg"));

        assert_eq!(store.get(Pointer::Issue).unwrap(), None);
        store.set(Pointer::Issue, "ABC-1\n").unwrap();
        store.set(Pointer::Board, "Team board").unwrap();

        assert_eq!(store.get(Pointer::Issue).unwrap().as_deref(), Some("ABC-1"));
        assert_eq!(store.require(Pointer::Board).unwrap(), "Team board");
        assert!(store.clear(Pointer::Issue).unwrap());
        assert!(!store.clear(Pointer::Issue).unwrap());
        assert!(matches!(store.require(Pointer::Issue), Err(CliError::Active(_))));
    }
}
