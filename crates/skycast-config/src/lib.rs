//! Configuration for the SkyCast dashboard.
//!
//! TOML file + `SKYCAST_*` environment overrides, API key resolution
//! (env var, plaintext, system keyring), on-disk path layout, and
//! translation to `skycast_core::WeatherConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::debug;

use skycast_core::WeatherConfig;
use skycast_core::config::{DEFAULT_BASE_URL, DEFAULT_ICON_URL_TEMPLATE};
use skycast_core::favorites::FAVORITES_FILE_NAME;
use skycast_core::model::ICON_PLACEHOLDER;

/// Keyring service name for the stored API key.
pub const KEYRING_SERVICE: &str = "skycast";
/// Keyring user name for the stored API key.
pub const KEYRING_USER: &str = "api-key";
/// Prefix of environment overrides, e.g. `SKYCAST_API_KEY`.
pub const ENV_PREFIX: &str = "SKYCAST_";

const LOG_FILE_NAME: &str = "skycast.log";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(
        "no API key configured (set SKYCAST_API_KEY or `api_key` in the config file, \
         or store one in the system keyring under 'skycast')"
    )]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Theme preference ────────────────────────────────────────────────

/// Initial colour scheme of the dashboard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemePreference {
    /// Follow the terminal's reported background.
    #[default]
    System,
    Light,
    Dark,
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API key (plaintext, prefer the keyring or an env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Name of an environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Provider API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Icon URL pattern containing `{icon}`.
    #[serde(default = "default_icon_url_template")]
    pub icon_url_template: String,

    /// Per-request timeout in seconds. Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Override for the favorites snapshot location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites_path: Option<PathBuf>,

    #[serde(default)]
    pub theme: ThemePreference,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
            base_url: default_base_url(),
            icon_url_template: default_icon_url_template(),
            timeout_secs: None,
            favorites_path: None,
            theme: ThemePreference::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_icon_url_template() -> String {
    DEFAULT_ICON_URL_TEMPLATE.into()
}

impl Config {
    /// Where the favorites snapshot lives.
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(default_favorites_path)
    }

    /// Validate and convert into the core runtime config.
    pub fn to_weather_config(&self, api_key: SecretString) -> Result<WeatherConfig, ConfigError> {
        let base_url: url::Url = self
            .base_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("invalid URL: {}", self.base_url),
            })?;

        if !self.icon_url_template.contains(ICON_PLACEHOLDER) {
            return Err(ConfigError::Validation {
                field: "icon_url_template".into(),
                reason: format!("must contain {ICON_PLACEHOLDER}"),
            });
        }

        let timeout = match self.timeout_secs {
            Some(0) => {
                return Err(ConfigError::Validation {
                    field: "timeout_secs".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            other => other.map(Duration::from_secs),
        };

        Ok(WeatherConfig {
            base_url,
            api_key,
            icon_url_template: self.icon_url_template.clone(),
            timeout,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "skycast", "skycast")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("skycast");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default favorites snapshot path under the platform data directory.
pub fn default_favorites_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join(FAVORITES_FILE_NAME),
        |dirs| dirs.data_dir().join(FAVORITES_FILE_NAME),
    )
}

/// Default log file path under the platform cache directory.
pub fn default_log_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".cache").join(LOG_FILE_NAME),
        |dirs| dirs.cache_dir().join(LOG_FILE_NAME),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `SKYCAST_*` env vars.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key from the credential chain.
///
/// 1. the env var named by `api_key_env`
/// 2. `api_key` (file or `SKYCAST_API_KEY`)
/// 3. system keyring entry `skycast` / `api-key`
pub fn resolve_api_key(cfg: &Config) -> Result<SecretString, ConfigError> {
    if let Some(key) = cfg
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
    {
        return Ok(SecretString::from(key));
    }

    if let Some(key) = cfg.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(SecretString::from(key.clone()));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    Err(ConfigError::NoCredentials)
}

/// Resolve credentials and build the core runtime config.
pub fn weather_config(cfg: &Config) -> Result<WeatherConfig, ConfigError> {
    let api_key = resolve_api_key(cfg)?;
    cfg.to_weather_config(api_key)
}
