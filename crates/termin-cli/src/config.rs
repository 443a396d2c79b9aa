//! Configuration loading from file and environment variables.

use serde::Deserialize;
use termin_voice::VoiceConfig;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Voice assistant settings. `api_base_url` here is ignored in favour of
    /// `api.base_url`.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// TerminFinder backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin of the backend, e.g. `https://terminfinder.example`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the practice profile endpoints.
    #[serde(default)]
    pub token: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "termin_voice=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Voice settings pointed at the configured backend.
    pub fn voice_config(&self) -> VoiceConfig {
        VoiceConfig {
            api_base_url: self.api.base_url.clone(),
            ..self.voice.clone()
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override holds an unusable value.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist, then applies `TERMIN_*` environment overrides.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if an override cannot be parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Environment variable overrides:
/// - `TERMIN_API_URL` overrides `api.base_url`
/// - `TERMIN_API_TOKEN` overrides `api.token`
/// - `TERMIN_CURRENT_PAGE` overrides `voice.current_page`
/// - `TERMIN_MAX_RECORDING_SECS` overrides `voice.max_recording_secs`
/// - `TERMIN_LOG_LEVEL` overrides `logging.level`
/// - `TERMIN_LOG_JSON` overrides `logging.json` (set to "true" to enable)
pub fn apply_env_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    if let Some(url) = var("TERMIN_API_URL") {
        config.api.base_url = url;
    }
    if let Some(token) = var("TERMIN_API_TOKEN") {
        config.api.token = Some(token).filter(|t| !t.trim().is_empty());
    }
    if let Some(page) = var("TERMIN_CURRENT_PAGE") {
        config.voice.current_page = page;
    }
    if let Some(secs) = var("TERMIN_MAX_RECORDING_SECS") {
        config.voice.max_recording_secs = secs.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "TERMIN_MAX_RECORDING_SECS",
            value: secs.clone(),
        })?;
    }
    if let Some(level) = var("TERMIN_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("TERMIN_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}
