//! Configuration loading tests
//!
//! File-based tests use an unused env prefix and disable the legacy
//! variables so the host environment cannot leak in. The env override test
//! mutates process state and must run alone:
//!
//! ```bash
//! cargo test -p relay-infrastructure --test unit config_tests -- --ignored --test-threads=1
//! ```

use relay_infrastructure::config::loader::validate_app_config;
use relay_infrastructure::config::{AppConfig, ConfigLoader, ModelProvider};
use relay_infrastructure::constants::{DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_SERVER_PORT};
use std::io::Write;
use std::time::Duration;

fn isolated_loader() -> ConfigLoader {
    ConfigLoader::new()
        .with_env_prefix("RELAY_TEST_ISOLATED")
        .with_legacy_env(false)
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
    assert_eq!(config.model.provider, ModelProvider::Gemini);
    assert_eq!(config.client.call_timeout(), Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS));
    assert!(config.client.server_url.is_none());
    assert!(!config.tools.mail.is_configured());
}

#[test]
fn test_default_gemini_requires_key() {
    let err = validate_app_config(&AppConfig::default()).expect_err("missing key");
    assert!(err.to_string().contains("API key"));
}

#[test]
fn test_toml_overrides_defaults() {
    let file = write_config(
        r#"
[server]
port = 8088
cors_origin = "https://app.example.com"

[model]
provider = "gemini"
api_key = "test-key"
model = "gemini-1.5-pro"

[client]
call_timeout_secs = 5

[bridge]
system_preamble = "Be terse."

[tools.mail]
username = "agent@example.com"
password = "secret"
"#,
    );

    let config = isolated_loader()
        .with_config_path(file.path())
        .load()
        .expect("load");

    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.cors_origin, "https://app.example.com");
    assert_eq!(config.model.api_key(), Some("test-key"));
    assert_eq!(config.model.model, "gemini-1.5-pro");
    assert_eq!(config.client.call_timeout_secs, 5);
    assert_eq!(config.bridge.system_preamble, "Be terse.");
    assert!(config.tools.mail.is_configured());
    // Untouched keys keep their defaults
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn test_rejects_zero_port() {
    let file = write_config("[server]\nport = 0\n[model]\nprovider = \"null\"\n");
    let err = isolated_loader()
        .with_config_path(file.path())
        .load()
        .expect_err("port 0");
    assert!(err.to_string().contains("port"));
}

#[test]
fn test_rejects_zero_call_timeout() {
    let file = write_config("[model]\nprovider = \"null\"\n[client]\ncall_timeout_secs = 0\n");
    assert!(
        isolated_loader()
            .with_config_path(file.path())
            .load()
            .is_err()
    );
}

#[test]
fn test_null_provider_needs_no_key() {
    let file = write_config("[model]\nprovider = \"null\"\n");
    let config = isolated_loader()
        .with_config_path(file.path())
        .load()
        .expect("load");
    assert_eq!(config.model.provider, ModelProvider::Null);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let figment = isolated_loader()
        .with_config_path(dir.path().join("absent.toml"))
        .figment();
    let config: AppConfig = figment.extract().expect("extract");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("relay.toml");
    let mut config = AppConfig::default();
    config.model.provider = ModelProvider::Null;
    config.server.port = 9100;

    let loader = isolated_loader();
    loader.save_to_file(&config, &path).expect("save");
    let loaded = loader.with_config_path(&path).load().expect("load");

    assert_eq!(loaded.server.port, 9100);
    assert_eq!(loaded.model.provider, ModelProvider::Null);
}

#[test]
fn test_debug_redacts_secrets() {
    let mut config = AppConfig::default();
    config.model.api_key = Some("very-secret".into());
    config.tools.mail.password = Some("hunter2".into());
    let debug = format!("{config:?}");
    assert!(!debug.contains("very-secret"));
    assert!(!debug.contains("hunter2"));
}

/// Helper to set env var; callers must run single-threaded
fn set_env(key: &str, value: &str) {
    // SAFETY: the test is ignored by default and run with --test-threads=1
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Helper to remove env var; callers must run single-threaded
fn remove_env(key: &str) {
    // SAFETY: the test is ignored by default and run with --test-threads=1
    unsafe {
        std::env::remove_var(key);
    }
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_overrides_file_and_legacy_names() {
    let file = write_config("[server]\nport = 8088\n");
    set_env("RELAY_MODEL__PROVIDER", "null");
    set_env("RELAY_SERVER__CORS_ORIGIN", "https://env.example.com");
    set_env("PORT", "9999");
    set_env("TWITTER_BEARER_TOKEN", "token-from-legacy");

    let result = ConfigLoader::new().with_config_path(file.path()).load();

    remove_env("RELAY_MODEL__PROVIDER");
    remove_env("RELAY_SERVER__CORS_ORIGIN");
    remove_env("PORT");
    remove_env("TWITTER_BEARER_TOKEN");

    let config = result.expect("load");
    assert_eq!(config.model.provider, ModelProvider::Null);
    assert_eq!(config.server.cors_origin, "https://env.example.com");
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.tools.social.bearer_token(), Some("token-from-legacy"));
}
