// Session state: the per-user key/value store that survives re-renders.
// The menu only reads and writes the single key it is handed; everything
// else in here belongs to the pages or the host application.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SESSION_FILE_NAME: &str = ".activities_menu_session.json";

/// Explicit session context passed by `&mut` into the menu and pages.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    values: BTreeMap<String, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Default location of the session file in the user's home directory.
    pub fn default_path() -> PathBuf {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.join(SESSION_FILE_NAME)
    }

    /// Load a session saved by [`SessionState::persist_to`]. A missing file
    /// is an empty session.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let state = serde_json::from_str(&data)
            .with_context(|| format!("Parsing session file {}", path.display()))?;
        Ok(state)
    }

    /// Persist the session as JSON so the selection survives restarts.
    pub fn persist_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Serializing session")?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        Ok(())
    }
}
