//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables and
//! default values.

use crate::config::{AppConfig, ModelProvider};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    LEGACY_ENV_MAPPINGS,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use relay_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,

    /// Whether the unprefixed legacy variables are read
    legacy_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
            legacy_env: true,
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enable or disable the legacy variables
    pub fn with_legacy_env(mut self, enabled: bool) -> Self {
        self.legacy_env = enabled;
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Prefixed environment variables (e.g. `RELAY_SERVER__PORT`)
    /// 4. Legacy variables (e.g. `GEMINI_API_KEY`, `PORT`)
    pub fn load(&self) -> Result<AppConfig> {
        let app_config: AppConfig = self
            .figment()
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// The merged figment before extraction
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        if self.legacy_env {
            figment = figment.merge(legacy_env());
        }
        figment
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join("config")
                .join(DEFAULT_CONFIG_FILENAME),
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
                .unwrap_or_default(),
        ];

        candidates
            .into_iter()
            .find(|path| !path.as_os_str().is_empty() && path.exists())
    }
}

/// Unprefixed variables mapped onto their config keys
fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV_MAPPINGS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_MAPPINGS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map_or_else(|| key.into(), |(_, target)| (*target).into())
    })
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(config)?;
    validate_model_config(config)?;
    validate_client_config(config)?;
    Ok(())
}

fn validate_server_config(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(Error::config("Server port cannot be 0"));
    }
    if config.server.host.trim().is_empty() {
        return Err(Error::config("Server host cannot be empty"));
    }
    Ok(())
}

fn validate_model_config(config: &AppConfig) -> Result<()> {
    if config.model.provider != ModelProvider::Gemini {
        return Ok(());
    }
    if config.model.api_key().is_none() {
        return Err(Error::config(
            "Gemini API key is required (set model.api_key or GEMINI_API_KEY)",
        ));
    }
    if config.model.model.trim().is_empty() {
        return Err(Error::config("Model name cannot be empty"));
    }
    if config.model.timeout_secs == 0 {
        return Err(Error::config("Model timeout cannot be 0"));
    }
    Ok(())
}

fn validate_client_config(config: &AppConfig) -> Result<()> {
    if config.client.handshake_timeout_secs == 0 {
        return Err(Error::config("Client handshake timeout cannot be 0"));
    }
    if config.client.call_timeout_secs == 0 {
        return Err(Error::config("Client call timeout cannot be 0"));
    }
    Ok(())
}
