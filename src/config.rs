//! Runtime configuration
//!
//! Settings are read from environment variables with defaults, then checked
//! by [`IdeaforgeConfig::validate`].
//!
//! # Environment Variables
//!
//! - `IDEAFORGE_PROVIDER`: genai adapter (openai|anthropic|gemini|groq|xai|ollama|...) - default: "openai"
//! - `IDEAFORGE_MODEL`: model name - default: "gpt-4o-mini"
//! - `IDEAFORGE_TEMPERATURE`: sampling temperature in (0, 1] - default: "0.3"
//! - `IDEAFORGE_MAX_TOKENS`: completion token cap - default: "2048"
//! - `IDEAFORGE_REQUEST_TIMEOUT`: per-call timeout in seconds - default: "60"
//! - `IDEAFORGE_COMPLETION_RETRIES`: extra attempts per stage - default: "1"
//! - `IDEAFORGE_STAGE_POLICY`: continue|abort - default: "continue"
//! - `IDEAFORGE_STORE_URL`: memory:// or file://<dir> - default: "memory://"
//! - `IDEAFORGE_TRANSCRIPT_FILE`: optional JSON-lines transcript path
//! - `IDEAFORGE_BIND` / `IDEAFORGE_PORT`: HTTP listener - default: "0.0.0.0" / "3000"
//! - `IDEAFORGE_LOG_LEVEL`: trace|debug|info|warn|error - default: "info"
//! - `IDEAFORGE_API_BASE_URL`: optional endpoint overriding the provider default
//!
//! Credentials are read by genai from the provider's own variable
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, ...).

use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::pipeline::{PipelineConfig, StageFailurePolicy};
use crate::store::StoreLocation;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_COMPLETION_RETRIES: u32 = 1;
const MAX_COMPLETION_RETRIES: u32 = 5;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: openai, anthropic, gemini, groq, xai, ollama")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

#[derive(Debug, Clone)]
pub struct IdeaforgeConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub completion_retries: u32,
    pub stage_policy: StageFailurePolicy,
    pub store: StoreLocation,
    pub transcript_file: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for IdeaforgeConfig {
    fn default() -> Self {
        Self {
            provider: AdapterKind::OpenAI,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            completion_retries: DEFAULT_COMPLETION_RETRIES,
            stage_policy: StageFailurePolicy::Continue,
            store: StoreLocation::Memory,
            transcript_file: None,
            api_base_url: None,
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    env_value(key)
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: e.to_string(),
            })
        })
        .transpose()
}

pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&s.to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

impl IdeaforgeConfig {
    /// Loads settings from `IDEAFORGE_*` variables on top of the defaults
    ///
    /// Unset or blank variables keep their default. A value that does not
    /// parse is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(provider) = env_value("IDEAFORGE_PROVIDER") {
            config.provider = parse_provider(&provider)?;
        }
        if let Some(model) = env_value("IDEAFORGE_MODEL") {
            config.model = model;
        }
        if let Some(temperature) = parse_env("IDEAFORGE_TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = parse_env("IDEAFORGE_MAX_TOKENS")? {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout) = parse_env("IDEAFORGE_REQUEST_TIMEOUT")? {
            config.request_timeout_secs = timeout;
        }
        if let Some(retries) = parse_env("IDEAFORGE_COMPLETION_RETRIES")? {
            config.completion_retries = retries;
        }
        if let Some(policy) = parse_env("IDEAFORGE_STAGE_POLICY")? {
            config.stage_policy = policy;
        }
        if let Some(store) = parse_env("IDEAFORGE_STORE_URL")? {
            config.store = store;
        }
        config.transcript_file = env_value("IDEAFORGE_TRANSCRIPT_FILE").map(PathBuf::from);
        config.api_base_url = env_value("IDEAFORGE_API_BASE_URL");
        if let Some(bind) = env_value("IDEAFORGE_BIND") {
            config.bind = bind;
        }
        if let Some(port) = parse_env("IDEAFORGE_PORT")? {
            config.port = port;
        }
        if let Some(level) = env_value("IDEAFORGE_LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if !(self.temperature > 0.0 && self.temperature <= 1.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be in (0, 1], got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.completion_retries > MAX_COMPLETION_RETRIES {
            return Err(ConfigError::ValidationFailed(format!(
                "Completion retries cannot exceed {}",
                MAX_COMPLETION_RETRIES
            )));
        }

        self.socket_addr()?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::ParseError {
                field: "IDEAFORGE_BIND".to_string(),
                error: e.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the genai-backed client for the configured provider and model
    pub fn create_llm_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let client = GenAIClient::new(
            self.provider,
            self.model.clone(),
            self.request_timeout(),
            self.api_base_url.clone(),
        )?;
        Ok(Arc::new(client))
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_policy(self.stage_policy)
            .with_completion_retries(self.completion_retries)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

impl fmt::Display for IdeaforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ideaforge Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Completion Retries: {}", self.completion_retries)?;
        writeln!(f, "  Stage Policy: {}", self.stage_policy)?;
        writeln!(f, "  Store: {}", self.store)?;
        if let Some(ref path) = self.transcript_file {
            writeln!(f, "  Transcript: {}", path.display())?;
        }
        writeln!(f, "  Listen: {}:{}", self.bind, self.port)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 13] = [
        "IDEAFORGE_PROVIDER",
        "IDEAFORGE_MODEL",
        "IDEAFORGE_TEMPERATURE",
        "IDEAFORGE_MAX_TOKENS",
        "IDEAFORGE_REQUEST_TIMEOUT",
        "IDEAFORGE_COMPLETION_RETRIES",
        "IDEAFORGE_STAGE_POLICY",
        "IDEAFORGE_STORE_URL",
        "IDEAFORGE_TRANSCRIPT_FILE",
        "IDEAFORGE_API_BASE_URL",
        "IDEAFORGE_BIND",
        "IDEAFORGE_PORT",
        "IDEAFORGE_LOG_LEVEL",
    ];

    /// Sets or clears an environment variable and restores it on drop
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clean_env() -> Vec<EnvGuard> {
        VARS.iter().map(|key| EnvGuard::unset(key)).collect()
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        let _guards = clean_env();

        let config = IdeaforgeConfig::from_env().unwrap();
        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.completion_retries, DEFAULT_COMPLETION_RETRIES);
        assert_eq!(config.stage_policy, StageFailurePolicy::Continue);
        assert_eq!(config.store, StoreLocation::Memory);
        assert!(config.transcript_file.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let mut guards = clean_env();
        guards.extend([
            EnvGuard::set("IDEAFORGE_PROVIDER", "Anthropic"),
            EnvGuard::set("IDEAFORGE_MODEL", "claude-3-5-haiku-latest"),
            EnvGuard::set("IDEAFORGE_TEMPERATURE", "0.7"),
            EnvGuard::set("IDEAFORGE_MAX_TOKENS", "4096"),
            EnvGuard::set("IDEAFORGE_REQUEST_TIMEOUT", "120"),
            EnvGuard::set("IDEAFORGE_COMPLETION_RETRIES", "0"),
            EnvGuard::set("IDEAFORGE_STAGE_POLICY", "abort"),
            EnvGuard::set("IDEAFORGE_STORE_URL", "file:///var/lib/ideaforge"),
            EnvGuard::set("IDEAFORGE_TRANSCRIPT_FILE", "/tmp/transcript.jsonl"),
            EnvGuard::set("IDEAFORGE_PORT", "8080"),
            EnvGuard::set("IDEAFORGE_LOG_LEVEL", "DEBUG"),
        ]);

        let config = IdeaforgeConfig::from_env().unwrap();
        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.completion_retries, 0);
        assert_eq!(config.stage_policy, StageFailurePolicy::Abort);
        assert_eq!(
            config.store,
            StoreLocation::File(PathBuf::from("/var/lib/ideaforge"))
        );
        assert_eq!(
            config.transcript_file,
            Some(PathBuf::from("/tmp/transcript.jsonl"))
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.policy, StageFailurePolicy::Abort);
        assert_eq!(pipeline.completion_retries, 0);
        assert_eq!(pipeline.max_tokens, 4096);
    }

    #[test]
    #[serial]
    fn test_unparseable_values_are_errors() {
        let mut guards = clean_env();
        guards.push(EnvGuard::set("IDEAFORGE_TEMPERATURE", "warm"));
        assert!(matches!(
            IdeaforgeConfig::from_env(),
            Err(ConfigError::ParseError { .. })
        ));
        drop(guards);

        let mut guards = clean_env();
        guards.push(EnvGuard::set("IDEAFORGE_PROVIDER", "skynet"));
        assert!(matches!(
            IdeaforgeConfig::from_env(),
            Err(ConfigError::InvalidProvider(_))
        ));
        drop(guards);

        let mut guards = clean_env();
        guards.push(EnvGuard::set("IDEAFORGE_STORE_URL", "mongodb://localhost"));
        assert!(IdeaforgeConfig::from_env().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let config = IdeaforgeConfig {
            temperature: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            temperature: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            request_timeout_secs: 601,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            completion_retries: 6,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IdeaforgeConfig {
            bind: "not an address".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = IdeaforgeConfig {
            bind: "127.0.0.1".to_string(),
            port: 8181,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8181");
    }

    #[test]
    fn test_create_llm_client_for_local_provider() {
        let config = IdeaforgeConfig {
            provider: AdapterKind::Ollama,
            model: "llama3.2".to_string(),
            ..Default::default()
        };
        let client = config.create_llm_client().unwrap();
        assert!(client.model_info().unwrap_or_default().contains("llama3.2"));
    }

    #[test]
    fn test_config_display() {
        let config = IdeaforgeConfig::default();
        let display = format!("{}", config);
        assert!(display.contains("Ideaforge Configuration:"));
        assert!(display.contains("Provider: OpenAI"));
        assert!(display.contains("Store: memory://"));
    }
}
