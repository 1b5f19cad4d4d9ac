use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default name of the persisted task file
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Configuration from tasklist.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data file, relative to the directory holding tasklist.toml
    #[serde(default = "default_data_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_data_file(),
        }
    }
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask before quitting the TUI
    #[serde(default = "default_true")]
    pub confirm_exit: bool,
    /// How long transient notifications stay on screen
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            confirm_exit: true,
            notification_secs: default_notification_secs(),
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_secs() -> u64 {
    3
}
