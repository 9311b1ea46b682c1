//! Configuration resolution for plm-aspects
//!
//! TOML file (see [`plm_common::config`]) with environment overrides.
//! Taxonomy bearer token priority: ENV → TOML.

use plm_common::config::{load_toml_config, resolve_config_path, write_toml_config, TomlConfig};
use plm_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable carrying the taxonomy bearer token
pub const TOKEN_ENV_VAR: &str = "PLM_TAXONOMY_TOKEN";

/// Config file name under `<config dir>/plm/`
pub const CONFIG_FILE_NAME: &str = "plm-aspects.toml";

/// Loaded configuration plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// None when no config location could be determined
    pub path: Option<PathBuf>,
}

/// Load the service configuration
///
/// A missing file is not an error: defaults apply.
pub fn load_service_config(cli_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = resolve_config_path(cli_path, CONFIG_FILE_NAME);

    let config = match &path {
        Some(path) => load_toml_config(path)?,
        None => {
            warn!("No config directory on this platform, using defaults");
            TomlConfig::default()
        }
    };

    Ok(LoadedConfig { config, path })
}

/// Resolve the taxonomy bearer token
///
/// **Priority:** ENV → TOML. Returns None when neither holds a valid token;
/// the service still starts, but schema fetches fail.
pub fn resolve_taxonomy_token(toml_config: &TomlConfig) -> Option<String> {
    let env_token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| is_valid_token(t));
    let toml_token = toml_config
        .taxonomy
        .oauth_token
        .clone()
        .filter(|t| is_valid_token(t));

    if env_token.is_some() && toml_token.is_some() {
        warn!(
            "Taxonomy token found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(token) = env_token {
        info!("Taxonomy token loaded from environment variable");
        return Some(token);
    }

    if let Some(token) = toml_token {
        info!("Taxonomy token loaded from TOML config");
        return Some(token);
    }

    warn!(
        "Taxonomy token not configured; schema fetches will fail. Set {} or [taxonomy] oauth_token",
        TOKEN_ENV_VAR
    );
    None
}

/// Token must be non-empty, non-whitespace
pub fn is_valid_token(token: &str) -> bool {
    !token.trim().is_empty()
}

/// Persist `token` as `[taxonomy] oauth_token` in the TOML file at `toml_path`
///
/// Other settings already in the file are kept; a missing file starts from
/// the defaults. The write is atomic and the file is left owner-only.
pub fn store_taxonomy_token(token: &str, toml_path: &Path) -> Result<()> {
    if !is_valid_token(token) {
        return Err(Error::Config("Taxonomy token must not be blank".to_string()));
    }

    let mut config = load_toml_config(toml_path)?;
    config.taxonomy.oauth_token = Some(token.trim().to_string());
    write_toml_config(&config, toml_path)?;

    info!("Taxonomy token written to {}", toml_path.display());
    Ok(())
}
