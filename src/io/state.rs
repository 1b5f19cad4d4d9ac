use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::task::TaskId;

const STATE_FILE_NAME: &str = ".tasklist-state.json";

/// Persisted TUI state (written to .tasklist-state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Task under the cursor when the TUI last exited
    #[serde(default)]
    pub cursor_task: Option<TaskId>,
    #[serde(default)]
    pub scroll_offset: usize,
    /// Last search pattern
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read the UI state. Missing or unreadable state is `None`.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(STATE_FILE_NAME)).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(data_dir.join(STATE_FILE_NAME), content)
}
