//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `FLEETLOG_*` environment variables.
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::app::SeedPolicy;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Falls back to [`crate::db::default_db_path`] when unset.
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where `export` writes when `--out` is not given. Defaults to the
    /// working directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            seed_policy: SeedPolicy::default(),
            log_level: default_log_level(),
            export_dir: None,
        }
    }
}

/// `<config dir>/fleetlog/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fleetlog").join("config.toml"))
}

impl AppConfig {
    /// Reads `explicit` if given (it must exist), otherwise the default
    /// config file if there is one.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        match explicit {
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }
        builder
            .add_source(Environment::with_prefix("FLEETLOG").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
