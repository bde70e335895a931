use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::config_io::state_dir;

/// Persisted TUI state (written to state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Query string of the last location, without the leading `?`
    #[serde(default)]
    pub last_query: String,
}

pub fn state_path() -> PathBuf {
    state_dir().join("state.json")
}

/// Read state; a missing or unreadable file yields `None`
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content)
}
