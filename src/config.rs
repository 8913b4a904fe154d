//! Configuration management.
//!
//! Settings live in a TOML file, by default
//! `~/.config/shellscope/config.toml`. `SHELLSCOPE_CONFIG` points at a
//! different file. A missing file means defaults; every section is
//! `#[serde(default)]` so a partial file only overrides what it names.
//! API keys are never stored here, only the name of the environment
//! variable that holds them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::CompletionParams;
use crate::transcript::TranscriptPaths;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "SHELLSCOPE_CONFIG";

/// Errors that can occur while loading or saving the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcript: TranscriptConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub report: ReportConfig,
}

/// Where the terminal recorder writes and where the cleaned copy goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub raw_path: PathBuf,
    pub clean_path: PathBuf,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("live-session.log"),
            clean_path: PathBuf::from("cleaned-session.log"),
        }
    }
}

impl TranscriptConfig {
    pub fn paths(&self) -> TranscriptPaths {
        TranscriptPaths::new(&self.raw_path, &self.clean_path)
    }
}

/// Model service selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Groq hosted API
    #[default]
    Groq,
    /// Local LM Studio server
    LmStudio,
    /// Any other OpenAI-compatible endpoint
    OpenAi,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::LmStudio => "lmstudio",
            Self::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::LmStudio => "http://localhost:3001/v1",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Groq => "meta-llama/llama-4-scout-17b-16e-instruct",
            Self::LmStudio => "local-model",
            Self::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::LmStudio => "LMSTUDIO_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Local servers accept unauthenticated requests.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::LmStudio)
    }
}

/// Model backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    /// Overrides the provider's default base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overrides the provider's default model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: 0.7,
            max_tokens: 512,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Sampling defaults for requests that do not override them.
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub dir: PathBuf,
    /// Filename template; supports `{date[:fmt]}` and `{time[:fmt]}`
    pub filename_template: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            filename_template: "cybersecurity_chat_report".to_string(),
        }
    }
}

impl Config {
    /// Path of the config file in use.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("shellscope").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Write the config to its file, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
