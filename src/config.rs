//! Configuration loading and management for decksmith.
//!
//! Loads settings from `decksmith.toml` with environment variable overrides for sensitive data.

use crate::repair::DEFAULT_MAX_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(Provider),
    #[error("unknown LLM provider: {0}")]
    UnknownProvider(String),
}

/// Which structured-generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    Ollama,
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM provider: "gemini", "openai" or "ollama"
    pub provider: Provider,
    /// Model used for outlines and slide content
    pub large_model: String,
    /// Model used for structure classification
    pub small_model: String,
    /// Base URL of the Ollama server
    pub ollama_url: String,
    /// HTTP timeout for a single model call
    pub timeout_secs: u64,
}

/// Generation defaults and repair settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Requests a step may issue before it fails
    pub max_attempts: u32,
    /// Output language when the caller does not name one
    pub language: String,
    /// Slide count when the caller does not name one
    pub n_slides: usize,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base path for data storage
    pub path: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the default location (decksmith.toml in cwd or home).
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::parse_file(&path)?,
            None => Config::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override provider, endpoint and API keys from environment variables
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api.gemini_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api.openai_key = Some(key);
        }
        if let Ok(provider) = std::env::var("LLM") {
            self.llm.provider = provider.parse()?;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            self.llm.ollama_url = url;
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("decksmith.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("decksmith")
            .join("decksmith.toml");
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the configured provider. Ollama needs none.
    pub fn api_key(&self) -> Result<Option<&str>, ConfigError> {
        match self.llm.provider {
            Provider::Gemini => self
                .api
                .gemini_key
                .as_deref()
                .map(Some)
                .ok_or(ConfigError::MissingApiKey(Provider::Gemini)),
            Provider::OpenAi => self
                .api
                .openai_key
                .as_deref()
                .map(Some)
                .ok_or(ConfigError::MissingApiKey(Provider::OpenAi)),
            Provider::Ollama => Ok(None),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            large_model: "gemini-2.5-flash".to_string(),
            small_model: "gemini-2.0-flash".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            language: "English".to_string(),
            n_slides: 8,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data"),
        }
    }
}
