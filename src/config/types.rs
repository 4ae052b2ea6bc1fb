// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
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

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// View resolution configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ViewsConfig {
    /// Set to false to skip the view stage entirely
    #[serde(default = "default_views_enabled")]
    pub enabled: bool,
    /// Base directory holding the view templates
    #[serde(default = "default_views_directory")]
    pub directory: String,
    /// Template file extension, without leading dot
    #[serde(default = "default_views_extension")]
    pub extension: String,
    /// Locals key holding an override view
    #[serde(default = "default_override_key")]
    pub override_key: String,
    /// Values merged into the locals of every request
    #[serde(default)]
    pub globals: Map<String, Value>,
    /// Path prefix -> override view. The longest matching prefix wins.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_views_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_views_directory() -> String {
    "views".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_views_extension() -> String {
    "hbs".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_override_key() -> String {
    "view".to_string()
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            enabled: default_views_enabled(),
            directory: default_views_directory(),
            extension: default_views_extension(),
            override_key: default_override_key(),
            globals: Map::new(),
            overrides: HashMap::new(),
        }
    }
}

/// Static file fallback configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StaticFilesConfig {
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,
    #[serde(default = "default_static_directory")]
    pub directory: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_static_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_static_directory() -> String {
    "public".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            directory: default_static_directory(),
            index_files: default_index_files(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_config_defaults_from_empty_table() {
        let views: ViewsConfig = toml::from_str("").unwrap();
        assert_eq!(views, ViewsConfig::default());
        assert_eq!(views.directory, "views");
        assert_eq!(views.extension, "hbs");
        assert_eq!(views.override_key, "view");
    }

    #[test]
    fn test_views_config_globals_and_overrides() {
        let views: ViewsConfig = toml::from_str(
            r#"
            directory = "templates"
            extension = "handlebars"

            [globals]
            site = "Cafe"
            year = 2026

            [overrides]
            "/admin" = "admin/fallback"
            "#,
        )
        .unwrap();
        assert_eq!(views.directory, "templates");
        assert_eq!(views.globals.get("site"), Some(&Value::from("Cafe")));
        assert_eq!(views.globals.get("year"), Some(&Value::from(2026)));
        assert_eq!(views.overrides.get("/admin").map(String::as_str), Some("admin/fallback"));
    }

    #[test]
    fn test_static_files_defaults() {
        let files: StaticFilesConfig = toml::from_str("directory = \"site\"").unwrap();
        assert!(files.enabled);
        assert_eq!(files.directory, "site");
        assert_eq!(files.index_files, vec!["index.html", "index.htm"]);
    }
}
