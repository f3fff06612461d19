use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Origin the notes API is served from
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// HTTP method used for `note/delete/{id}`
    #[serde(default)]
    pub delete_method: DeleteMethod,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            delete_method: DeleteMethod::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Older backends only route GET for deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    #[default]
    Delete,
    Get,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file. The TUI owns the terminal, so without a file nothing is logged there.
    #[serde(default)]
    pub file: Option<String>,
    /// tracing-subscriber filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: None,
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
