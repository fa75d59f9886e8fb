use crate::theme::ThemeName;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_MODEL_PATH: &str = "models/phi-1_5-Q4_K_M.gguf";
pub const MODEL_DOWNLOAD_HINT: &str =
    "cd models && wget https://huggingface.co/TKDKid1000/phi-1_5-GGUF/resolve/main/phi-1_5-Q4_K_M.gguf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub execution: ExecutionConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    #[default]
    #[serde(rename = "llama-cpp")]
    #[value(name = "llama-cpp")]
    LlamaCpp,
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    #[value(name = "anthropic")]
    Anthropic,
}

impl Provider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::LlamaCpp => "http://127.0.0.1:8080",
            Provider::OpenAi => "https://api.openai.com",
            Provider::Anthropic => "https://api.anthropic.com",
        }
    }

    fn api_key_var(self) -> Option<&'static str> {
        match self {
            Provider::LlamaCpp => None,
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: Provider,
    #[validate(url(message = "endpoint must be a URL"))]
    pub endpoint: Option<String>,
    pub model_path: PathBuf,
    /// Remote model name; llama-cpp derives it from `model_path`.
    pub model: Option<String>,
    pub api_key: Option<String>,
    #[validate(range(min = 1, message = "max_tokens must be at least 1"))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0, message = "temperature must be between 0 and 2"))]
    pub temperature: f32,
    #[validate(range(min = 0.0, max = 1.0, message = "top_p must be between 0 and 1"))]
    pub top_p: f32,
    #[validate(range(min = 1, message = "request_timeout_secs must be at least 1"))]
    pub request_timeout_secs: u32,
    #[validate(range(min = 1, message = "max_retries must be at least 1"))]
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::LlamaCpp,
            endpoint: None,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model: None,
            api_key: None,
            max_tokens: 100,
            temperature: 0.1,
            top_p: 0.9,
            request_timeout_secs: 120,
            max_retries: 3,
        }
    }
}

impl ModelConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    pub fn model_name(&self) -> String {
        match (self.provider, &self.model) {
            (_, Some(model)) => model.clone(),
            (Provider::LlamaCpp, None) => self
                .model_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "local".to_string()),
            (Provider::OpenAi, None) => "gpt-4o-mini".to_string(),
            (Provider::Anthropic, None) => "claude-3-5-haiku-latest".to_string(),
        }
    }

    /// Whether a local model file has to exist before start-up.
    pub fn requires_model_file(&self) -> bool {
        self.provider == Provider::LlamaCpp
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct ExecutionConfig {
    #[validate(range(min = 1, message = "command_timeout_secs must be at least 1"))]
    pub command_timeout_secs: u32,
    #[validate(range(min = 1, message = "branch_query_timeout_secs must be at least 1"))]
    pub branch_query_timeout_secs: u32,
    pub require_confirmation: bool,
    #[validate(length(min = 1, message = "git_binary cannot be empty"))]
    pub git_binary: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 30,
            branch_query_timeout_secs: 10,
            require_confirmation: true,
            git_binary: "git".to_string(),
        }
    }
}

impl ExecutionConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.command_timeout_secs))
    }

    pub fn branch_query_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.branch_query_timeout_secs))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub theme: ThemeName,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            theme: ThemeName::Dark,
        }
    }
}

impl Config {
    pub fn create_default(path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `explicit` (which must exist) or the default location (which may
    /// be absent, in which case defaults apply).
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load(path),
            None => match get_config_path() {
                Ok(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Fills the API key and endpoint from environment lookups. Values
    /// already present in the file win for the key; `GITI_ENDPOINT` always
    /// wins for the endpoint.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.model.api_key.is_none() {
            self.model.api_key = lookup("GITI_API_KEY")
                .or_else(|| self.model.provider.api_key_var().and_then(&lookup))
                .filter(|key| !key.is_empty());
        }
        if let Some(endpoint) = lookup("GITI_ENDPOINT").filter(|e| !e.is_empty()) {
            self.model.endpoint = Some(endpoint);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: validator::ValidationErrors| ConfigError::Invalid(e.to_string());
        self.model.validate().map_err(invalid)?;
        self.execution.validate().map_err(invalid)?;
        if self.model.provider != Provider::LlamaCpp && self.model.api_key.is_none() {
            return Err(ConfigError::Invalid(format!(
                "the {:?} provider needs an API key (set GITI_API_KEY)",
                self.model.provider
            )));
        }
        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "giti", "giti").ok_or(ConfigError::NoConfigDir)?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
