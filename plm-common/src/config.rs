//! Configuration loading and config file resolution
//!
//! Every section of [`TomlConfig`] is optional; a missing file, a missing
//! section or a missing key all fall back to the compiled defaults below.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLM_CONFIG";

/// Default bind address for the aspects service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";

/// Default taxonomy API root
pub const DEFAULT_TAXONOMY_BASE_URL: &str = "https://api.ebay.com";

/// Full TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub taxonomy: TaxonomyConfig,
    pub cache: CacheConfig,
    pub truncation: TruncationConfig,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset (e.g. "info", "plm_aspects=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[taxonomy]` section: marketplace taxonomy provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub base_url: String,
    pub category_tree_id: String,
    pub marketplace_id: String,
    /// Bearer token; the PLM_TAXONOMY_TOKEN environment variable takes priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TAXONOMY_BASE_URL.to_string(),
            category_tree_id: "0".to_string(),
            marketplace_id: "EBAY_US".to_string(),
            oauth_token: None,
        }
    }
}

/// `[cache]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

/// `[truncation]` section: allowed-value caps for the UI-facing schema view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruncationConfig {
    /// Cap for REQUIRED and RECOMMENDED aspects
    pub primary_cap: usize,
    /// Cap for OPTIONAL aspects
    pub optional_cap: usize,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            primary_cap: 100,
            optional_cap: 25,
        }
    }
}

/// Resolve the config file path
///
/// Priority:
/// 1. Command-line argument
/// 2. `PLM_CONFIG` environment variable
/// 3. `<user config dir>/plm/<file_name>`
///
/// Returns None when no candidate can be determined (no config dir on this platform).
pub fn resolve_config_path(cli_arg: Option<&Path>, file_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("plm").join(file_name))
}

/// Load TOML config from `path`
///
/// A missing file yields the defaults; an unreadable or malformed file is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write TOML config atomically (temp file + rename)
///
/// On Unix the file is restricted to 0600 since it may hold a bearer token.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600)) {
            warn!("Could not restrict permissions on {}: {}", temp_path.display(), e);
        }
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}
