// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ReagError, Result};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BATCH_SIZE: usize = 20;
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FILTRATION_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_REASONING_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    pub filtration: ModelConfig,
    pub reasoning: ModelConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Controls how the cli turns a directory into documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_patterns: default_skip_patterns(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Replaces the built-in system prompt when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            system_prompt: None,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string(), "txt".to_string()]
}

fn default_skip_patterns() -> Vec<String> {
    vec![".git/".to_string(), "node_modules/".to_string()]
}

fn default_max_file_size_mb() -> usize {
    10
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            model: model.into(),
            api_key: None,
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    fn validate(&self, role: &str) -> Result<()> {
        Validator::validate_url(&self.base_url)
            .map_err(|e| ReagError::Config(format!("{} model: {}", role, e)))?;

        if self.model.trim().is_empty() {
            return Err(ReagError::Config(format!(
                "{} model name must not be empty",
                role
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ReagError::Config(format!(
                "{} timeout_secs must be greater than 0",
                role
            )));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        // Model names are seeded so environment-only setups deserialize.
        let mut builder = config::Config::builder()
            .set_default("filtration.model", DEFAULT_FILTRATION_MODEL)
            .and_then(|b| b.set_default("reasoning.model", DEFAULT_REASONING_MODEL))
            .map_err(|e| ReagError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REAG")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ReagError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ReagError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            engine: EngineSettings::default(),
            filtration: ModelConfig::new(DEFAULT_FILTRATION_MODEL),
            reasoning: ModelConfig::new(DEFAULT_REASONING_MODEL),
            loader: LoaderConfig::default(),
        }
    }

    /// Fills missing API keys from `GROQ_API_KEY` / `OPENAI_API_KEY`.
    pub fn with_env_api_keys(mut self) -> Self {
        let fallback = std::env::var("GROQ_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok();

        for model in [&mut self.filtration, &mut self.reasoning] {
            if model.api_key.is_none() {
                model.api_key = fallback.clone();
            }
        }

        self
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_batch_size(self.engine.batch_size)
            .map_err(|e| ReagError::Config(e.to_string()))?;

        if let Some(prompt) = &self.engine.system_prompt {
            Validator::validate_content_not_empty(prompt)
                .map_err(|_| ReagError::Config("system_prompt must not be blank".to_string()))?;
        }

        self.filtration.validate("filtration")?;
        self.reasoning.validate("reasoning")?;

        if self.loader.extensions.is_empty() {
            return Err(ReagError::Config(
                "loader.extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }
}
