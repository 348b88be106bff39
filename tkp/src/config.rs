//! TicketPlease configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main TicketPlease configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider credentials
    #[serde(rename = "api-keys")]
    pub api_keys: ApiKeysConfig,

    /// Model and request settings
    pub llm: LlmConfig,

    /// Defaults offered while collecting a task
    pub preferences: PreferencesConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// True when provider, API key and model are all set
    pub fn is_configured(&self) -> bool {
        !self.api_keys.provider.trim().is_empty()
            && !self.api_keys.api_key.trim().is_empty()
            && !self.llm.model.trim().is_empty()
    }
}

/// Provider credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeysConfig {
    /// Provider code (openai, anthropic, gemini, openrouter)
    pub provider: String,

    /// API key for the provider
    #[serde(rename = "api-key")]
    pub api_key: String,
}

impl Default for ApiKeysConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: String::new(),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Endpoint override; empty means the provider default
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_ms: 120_000,
            base_url: String::new(),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Output language code (en, es)
    #[serde(rename = "default-output-language")]
    pub default_output_language: String,

    /// Platform code (github, jira)
    #[serde(rename = "default-platform")]
    pub default_platform: String,

    /// Default acceptance criteria file; empty when not set
    #[serde(rename = "default-ac-path")]
    pub default_ac_path: String,

    /// Default definition of done file; empty when not set
    #[serde(rename = "default-dod-path")]
    pub default_dod_path: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            default_output_language: "es".to_string(),
            default_platform: "github".to_string(),
            default_ac_path: String::new(),
            default_dod_path: String::new(),
        }
    }
}

/// Default location: ~/.config/ticketplease/config.yml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ticketplease")
        .join("config.yml")
}

/// File-backed configuration store
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Open the store at `path` (or the default location) and load it
    ///
    /// A missing file yields defaults; an unparsable file is an error.
    pub fn open(path: Option<&PathBuf>) -> Result<Self> {
        let path = path.cloned().unwrap_or_else(default_config_path);
        debug!(?path, "ConfigStore::open: called");
        let config = Self::load_from(&path)?;
        Ok(Self { path, config })
    }

    /// Build a store around an in-memory config without touching disk
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Re-read the file and return the current settings
    pub fn load(&mut self) -> Result<Config> {
        debug!(path = ?self.path, "ConfigStore::load: called");
        self.config = Self::load_from(&self.path)?;
        Ok(self.config.clone())
    }

    /// Write the whole configuration, creating parent directories
    ///
    /// The document is serialized before the file is opened so a
    /// serialization error never leaves a truncated file behind.
    pub fn save(&mut self, config: Config) -> Result<()> {
        debug!(path = ?self.path, "ConfigStore::save: called");
        let content = serde_yaml::to_string(&config).context("Failed to serialize config")?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, content).context(format!("Failed to write {}", self.path.display()))?;

        info!("Saved config to: {}", self.path.display());
        self.config = config;
        Ok(())
    }

    /// True when no config file exists yet
    pub fn is_first_run(&self) -> bool {
        !self.path.exists()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &str {
        &self.config.api_keys.provider
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_keys.api_key
    }

    pub fn model(&self) -> &str {
        &self.config.llm.model
    }

    pub fn platform(&self) -> &str {
        &self.config.preferences.default_platform
    }

    pub fn language(&self) -> &str {
        &self.config.preferences.default_output_language
    }

    pub fn ac_path(&self) -> &str {
        &self.config.preferences.default_ac_path
    }

    pub fn dod_path(&self) -> &str {
        &self.config.preferences.default_dod_path
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken file is reported later by `open`.
    pub fn load_log_level(path: Option<&PathBuf>) -> Option<String> {
        let path = path.cloned().unwrap_or_else(default_config_path);
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str::<Config>(&content).ok()?.log_level
    }
}
