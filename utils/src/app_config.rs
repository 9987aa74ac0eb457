use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

use super::error::{Error, Result};

lazy_static! {
    static ref BUILDER: RwLock<ConfigBuilder<DefaultState>> = RwLock::new(Config::builder());
}

/// Diagnostics logging, not the event log file given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Log top-level source entries that appeared since the previous pass.
    pub track_new_items: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub console: ConsoleConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    /// Reset the configuration to the given TOML defaults layered under
    /// `FOLDER_MIRROR_*` environment variables (`__` separates nested keys).
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        if let Some(contents) = default_config {
            builder =
                builder.add_source(config::File::from_str(contents, config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLDER_MIRROR")
                .prefix_separator("_")
                .separator("__"),
        );

        *BUILDER.write()? = builder;
        Ok(())
    }

    /// Layer a configuration file on top of the current sources.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(path) = config_file {
            let name = path
                .to_str()
                .ok_or_else(|| Error::new(&format!("Invalid config path: {}", path.display())))?;
            let mut builder = BUILDER.write()?;
            *builder = builder.clone().add_source(config::File::with_name(name));
        }
        Ok(())
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut builder = BUILDER.write()?;
        *builder = builder.clone().set_override(key, value)?;
        Ok(())
    }

    pub fn get<'de, T>(key: &str) -> Result<T>
    where
        T: Deserialize<'de>,
    {
        let config = BUILDER.read()?.clone().build()?;
        Ok(config.get::<T>(key)?)
    }

    pub fn fetch() -> Result<AppConfig> {
        let config = BUILDER.read()?.clone().build()?;
        Ok(config.try_deserialize()?)
    }
}
