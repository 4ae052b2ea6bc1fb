// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
    ViewsConfig,
};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is fine; environment variables and defaults still apply.
    /// Environment keys look like `VIEWROUTE__VIEWS__DIRECTORY`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("VIEWROUTE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "viewroute")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("views.directory", "views")?
            .set_default("views.extension", "hbs")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.views.extension = cfg.views.extension.trim_start_matches('.').to_string();
        if let Some(tables) = ViewTables::read(config_path)? {
            tables.restore_case(&mut cfg.views);
        }
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// `[views.globals]` and `[views.overrides]` exactly as written in the file
///
/// The `config` builder lowercases every key, but both tables hold
/// user-chosen names (template variables, request paths) where case matters.
#[derive(Debug, Default, Deserialize)]
struct ViewTables {
    #[serde(default)]
    globals: Map<String, Value>,
    #[serde(default)]
    overrides: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawFile {
    #[serde(default)]
    views: ViewTables,
}

impl ViewTables {
    /// Read the tables from the TOML file `load_from` picked up, if any
    fn read(config_path: &str) -> Result<Option<Self>, config::ConfigError> {
        let Some(path) = toml_file(config_path) else {
            return Ok(None);
        };
        let source = fs::read_to_string(&path).map_err(|e| {
            config::ConfigError::Message(format!("{}: {e}", path.display()))
        })?;
        let raw: RawFile = toml::from_str(&source).map_err(|e| {
            config::ConfigError::Message(format!("{}: {e}", path.display()))
        })?;
        Ok(Some(raw.views))
    }

    /// Move folded keys back to their written spelling
    ///
    /// Values keep whatever the layered config settled on, so environment
    /// overrides still win. A value that is just the file's value with folded
    /// keys is replaced by the file's value to restore nested keys too.
    fn restore_case(self, views: &mut ViewsConfig) {
        for (key, written) in self.globals {
            let Some(layered) = views.globals.remove(&key.to_lowercase()) else {
                continue;
            };
            let value = if layered == fold_keys(&written) { written } else { layered };
            views.globals.insert(key, value);
        }
        for (prefix, _) in self.overrides {
            if let Some(view) = views.overrides.remove(&prefix.to_lowercase()) {
                views.overrides.insert(prefix, view);
            }
        }
    }
}

/// Locate the TOML file `config::File::with_name` would load for `config_path`
fn toml_file(config_path: &str) -> Option<PathBuf> {
    let exact = PathBuf::from(config_path);
    if exact.extension().is_some_and(|ext| ext == "toml") && exact.is_file() {
        return Some(exact);
    }
    let with_ext = PathBuf::from(format!("{config_path}.toml"));
    with_ext.is_file().then_some(with_ext)
}

fn fold_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(fold_keys).collect()),
        other => other.clone(),
    }
}
