//! Service configuration tests
//!
//! Environment-mutating tests run serially.

use plm_aspects::config::{
    is_valid_token, load_service_config, resolve_taxonomy_token, store_taxonomy_token,
    TOKEN_ENV_VAR,
};
use plm_common::config::load_toml_config;
use plm_aspects::AppState;
use plm_common::config::TomlConfig;
use serial_test::serial;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn config_with_token(token: Option<&str>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.taxonomy.oauth_token = token.map(str::to_string);
    config
}

#[test]
#[serial]
fn test_env_token_wins_over_toml() {
    std::env::set_var(TOKEN_ENV_VAR, "env-token");

    let token = resolve_taxonomy_token(&config_with_token(Some("toml-token")));

    std::env::remove_var(TOKEN_ENV_VAR);
    assert_eq!(token.as_deref(), Some("env-token"));
}

#[test]
#[serial]
fn test_toml_token_used_without_env() {
    std::env::remove_var(TOKEN_ENV_VAR);

    let token = resolve_taxonomy_token(&config_with_token(Some("toml-token")));

    assert_eq!(token.as_deref(), Some("toml-token"));
}

#[test]
#[serial]
fn test_blank_tokens_are_ignored() {
    std::env::set_var(TOKEN_ENV_VAR, "   ");

    let token = resolve_taxonomy_token(&config_with_token(Some("")));

    std::env::remove_var(TOKEN_ENV_VAR);
    assert_eq!(token, None);
}

#[test]
fn test_is_valid_token() {
    assert!(is_valid_token("abc"));
    assert!(!is_valid_token(""));
    assert!(!is_valid_token(" \t"));
}

#[test]
#[serial]
fn test_load_service_config_from_cli_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
bind_addr = "0.0.0.0:9000"

[cache]
ttl_hours = 6

[truncation]
primary_cap = 50
"#
    )
    .unwrap();

    let loaded = load_service_config(Some(file.path())).unwrap();

    assert_eq!(loaded.path.as_deref(), Some(file.path()));
    assert_eq!(loaded.config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(loaded.config.cache.ttl_hours, 6);
    assert_eq!(loaded.config.truncation.primary_cap, 50);
    assert_eq!(loaded.config.truncation.optional_cap, 25);
    assert_eq!(loaded.config.taxonomy.marketplace_id, "EBAY_US");
}

#[test]
#[serial]
fn test_load_service_config_rejects_bad_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[cache]\nttl_hours = \"soon\"").unwrap();

    assert!(load_service_config(Some(file.path())).is_err());
}

#[tokio::test]
async fn test_state_from_config_starts_without_token() {
    let state = AppState::from_config(&TomlConfig::default(), None).unwrap();

    assert_eq!(state.aspects.cache().ttl().num_hours(), 24);
    assert_eq!(state.truncation.primary_cap, Some(100));
    assert_eq!(state.truncation.optional_cap, Some(25));
}

#[test]
#[serial]
fn test_stored_token_is_resolved_and_keeps_other_settings() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plm-aspects.toml");
    std::fs::write(&path, "[cache]\nttl_hours = 6\n").unwrap();

    store_taxonomy_token("  stored-token ", &path).unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.cache.ttl_hours, 6);
    assert_eq!(config.taxonomy.oauth_token.as_deref(), Some("stored-token"));

    std::env::remove_var(TOKEN_ENV_VAR);
    assert_eq!(resolve_taxonomy_token(&config).as_deref(), Some("stored-token"));
}

#[test]
fn test_store_token_creates_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plm").join("plm-aspects.toml");

    store_taxonomy_token("fresh-token", &path).unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.taxonomy.oauth_token.as_deref(), Some("fresh-token"));
    assert_eq!(config.taxonomy.marketplace_id, "EBAY_US");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_store_blank_token_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plm-aspects.toml");

    let err = store_taxonomy_token("   ", &path).unwrap_err();

    assert!(matches!(err, plm_common::Error::Config(_)));
    assert!(!path.exists());
}
