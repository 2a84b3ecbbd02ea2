// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (defaults to CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Static file configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticFilesConfig {
    /// Directory that receives the copied assets (e.g. `target/site`)
    pub serve_root: String,
    /// Development source tree the assets are copied from
    pub source_root: String,
    /// Folder under both roots, e.g. `/static`
    pub folder: String,
    /// File served for `/`
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Copy `source_root + folder` into `serve_root + folder` at configuration time
    #[serde(default = "default_copy_on_start")]
    pub copy_on_start: bool,
}

fn default_index_file() -> String {
    crate::handler::static_files::DEFAULT_INDEX_FILE.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_copy_on_start() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: error, warn, info, debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}
