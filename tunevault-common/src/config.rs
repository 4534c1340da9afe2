//! Configuration loading and store root resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the synchronized store root
pub const STORE_ROOT_ENV: &str = "TUNEVAULT_STORE_ROOT";
/// Environment variable overriding the HTTP bind address
pub const BIND_ADDRESS_ENV: &str = "TUNEVAULT_BIND_ADDRESS";

/// Default HTTP bind address for the sync service
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5741";

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing level filter (e.g. "info", "tunevault_sync=debug")
    pub level: Option<String>,
}

/// Service configuration loaded from the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Address the HTTP API binds to
    pub bind_address: Option<String>,
    /// Local folder mirrored by the synchronized store agent
    pub store_root: Option<String>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from the platform default location, falling back to
    /// defaults when no file exists
    pub fn load_default() -> Self {
        match default_config_path() {
            Some(path) if path.exists() => match Self::load(&path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring unreadable config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunevault").join("config.toml"))
}

/// Store root resolution priority order:
/// 1. Environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_store_root(config: &TomlConfig) -> PathBuf {
    if let Ok(path) = std::env::var(STORE_ROOT_ENV) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.store_root {
        return PathBuf::from(path);
    }

    default_store_root()
}

/// Bind address resolution, same priority order as the store root
pub fn resolve_bind_address(config: &TomlConfig) -> String {
    if let Ok(addr) = std::env::var(BIND_ADDRESS_ENV) {
        return addr;
    }

    config
        .bind_address
        .clone()
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
}

/// Get OS-dependent default store root path
fn default_store_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tunevault").join("store"))
        .unwrap_or_else(|| PathBuf::from("./tunevault_store"))
}

/// Create the store root directory if missing
pub fn ensure_store_root(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| Error::Config(format!("Create store root {:?} failed: {}", path, e)))?;
        info!("Created store root {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parse_full() {
        let config: TomlConfig = toml::from_str(
            r#"
            bind_address = "0.0.0.0:9000"
            store_root = "/srv/music/store"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.store_root.as_deref(), Some("/srv/music/store"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_toml_parse_empty_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert!(config.bind_address.is_none());
        assert!(config.store_root.is_none());
        assert!(config.logging.level.is_none());
    }
}
