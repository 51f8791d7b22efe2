use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Content policy shared by the generators and the validator
    #[serde(default)]
    pub content: ContentConfig,

    /// Model provider settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    // @provider: OpenAI Responses API
    #[default]
    OpenAI,
    // @provider: Anthropic Messages API
    Anthropic,
}

impl ModelProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Model used when none is configured
    pub fn default_model(&self) -> String {
        match self {
            Self::OpenAI => "gpt-4.1-mini".to_string(),
            Self::Anthropic => "claude-3-5-haiku-latest".to_string(),
        }
    }

    // @returns: Public API base URL
    pub fn default_endpoint(&self) -> String {
        match self {
            Self::OpenAI => "https://api.openai.com/v1".to_string(),
            Self::Anthropic => "https://api.anthropic.com".to_string(),
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ModelProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Content policy: length window, image mode, word list, repetition limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContentConfig {
    /// Minimum markup length in characters
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Maximum markup length in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Embed image URLs as plain list items instead of image elements
    #[serde(default)]
    pub inline_images: bool,

    /// Banned-word list, one term per line
    #[serde(default = "default_banned_words_path")]
    pub banned_words_path: String,

    /// A sentence repeated this many times fails validation
    #[serde(default = "default_max_sentence_repeat")]
    pub max_sentence_repeat: usize,

    /// Distinct/total sentence ratio below this fails validation
    #[serde(default = "default_min_unique_sentence_ratio")]
    pub min_unique_sentence_ratio: f64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            inline_images: false,
            banned_words_path: default_banned_words_path(),
            max_sentence_repeat: default_max_sentence_repeat(),
            min_unique_sentence_ratio: default_min_unique_sentence_ratio(),
        }
    }
}

/// Model provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: ModelProvider,

    /// Model name; empty selects the provider default
    #[serde(default = "String::new")]
    pub model: String,

    /// API key for the provider
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL; empty selects the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for a transient failure of a single request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Output token budget per completion
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Products generated in parallel by the batch runner
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            max_output_tokens: default_max_output_tokens(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

impl GenerationConfig {
    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            self.model.clone()
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            self.provider.default_endpoint()
        } else {
            self.endpoint.clone()
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_min_chars() -> usize {
    25_000
}

fn default_max_chars() -> usize {
    27_000
}

fn default_banned_words_path() -> String {
    "data/banned_words.txt".to_string()
}

fn default_max_sentence_repeat() -> usize {
    200
}

fn default_min_unique_sentence_ratio() -> f64 {
    0.01
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

fn default_max_output_tokens() -> u32 {
    16_000
}

fn default_concurrent_requests() -> usize {
    4
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Load the file if it exists, otherwise write and return the defaults
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let content = &self.content;
        if content.min_chars < 3 {
            return Err(anyhow!("min_chars must be at least 3, got {}", content.min_chars));
        }
        if content.max_chars < content.min_chars {
            return Err(anyhow!(
                "max_chars ({}) must not be below min_chars ({})",
                content.max_chars,
                content.min_chars
            ));
        }
        if content.max_sentence_repeat == 0 {
            return Err(anyhow!("max_sentence_repeat must be positive"));
        }
        if !(0.0..=1.0).contains(&content.min_unique_sentence_ratio) {
            return Err(anyhow!(
                "min_unique_sentence_ratio must be within [0, 1], got {}",
                content.min_unique_sentence_ratio
            ));
        }
        if self.generation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be positive"));
        }

        if self.generation.api_key.is_empty() {
            warn!(
                "No API key configured for {}; descriptions will come from the stub generator",
                self.generation.provider.display_name()
            );
        }

        Ok(())
    }
}
