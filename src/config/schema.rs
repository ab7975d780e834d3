use std::path::Path;

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

use crate::catalog::{ServerVersionFamily, DEFAULT_SCHEMA};

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct AdapterConfig {
    pub connection: Connection,
    #[serde(default)]
    pub cache: Cache,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Connection {
    pub dsn: String,
    /// Fallback owner of unqualified table names
    pub username: Option<String>,
    pub default_schema: Option<String>,
    /// Server major version; skips the `@@version` probe when set
    pub server_version: Option<u32>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Cache {
    /// Maximum number of table descriptors kept in memory
    pub max_tables: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self { max_tables: 1024 }
    }
}

impl AdapterConfig {
    /// Owner assumed for unqualified table names: the configured schema, else
    /// the connecting user, else `dbo`
    pub fn default_schema_name(&self) -> String {
        fn non_blank(name: &Option<String>) -> Option<&str> {
            name.as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
        }

        non_blank(&self.connection.default_schema)
            .or_else(|| non_blank(&self.connection.username))
            .unwrap_or(DEFAULT_SCHEMA)
            .to_string()
    }
}

pub fn validate_config(config: AdapterConfig) -> Result<AdapterConfig, ConfigError> {
    if let Some(version) = config.connection.server_version {
        if ServerVersionFamily::from_major(version).is_err() {
            return Err(ConfigError::Message(format!(
                "Server version {version} is not supported (expected one of 9, 11, 12, 16, 17)"
            )));
        }
    }

    if config.cache.max_tables == 0 {
        return Err(ConfigError::Message(
            "cache.max_tables must be greater than zero".to_string(),
        ));
    }

    if config.connection.max_connections == 0 {
        return Err(ConfigError::Message(
            "connection.max_connections must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<AdapterConfig, ConfigError> {
    let path = path.to_str().ok_or_else(|| {
        ConfigError::Message(format!("Config path {path:?} is not valid UTF-8"))
    })?;
    let config = Config::builder().add_source(File::with_name(path));

    config.build()?.try_deserialize().and_then(validate_config)
}

// Load a config from a string (to test our structs are defined correctly)
pub fn load_config_from_string(
    config_str: &str,
    skip_validation: bool,
) -> Result<AdapterConfig, ConfigError> {
    let config =
        Config::builder().add_source(File::from_str(config_str, FileFormat::Toml));

    if skip_validation {
        config.build()?.try_deserialize()
    } else {
        config.build()?.try_deserialize().and_then(validate_config)
    }
}
