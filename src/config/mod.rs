//! Configuration management for the ruminate application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. The resulting `Config` is
//! constructed once at process start and passed by reference into the model
//! client and the pipeline operations; there is no global singleton.
//!
//! # Environment Variables
//!
//! - `RUMINATE_PROVIDER`: Model provider, "ollama" (default) or "openai"
//! - `RUMINATE_MODEL`: Model name (defaults depend on the provider)
//! - `RUMINATE_BASE_URL`: Base URL of the provider API
//! - `RUMINATE_API_KEY`: API key, required when the provider is "openai"
//! - `RUMINATE_TEMPERATURE`: Sampling temperature (defaults to 0.7)
//! - `RUMINATE_TIMEOUT_SECS`: Request timeout in seconds (defaults to 120)

use crate::constants::{
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, ENV_VAR_API_KEY, ENV_VAR_BASE_URL, ENV_VAR_MODEL,
    ENV_VAR_PROVIDER, ENV_VAR_TEMPERATURE, ENV_VAR_TIMEOUT_SECS, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    /// Local Ollama server (no credential required).
    Ollama,
    /// OpenAI-compatible chat completions API (requires an API key).
    OpenAi,
}

impl ModelProvider {
    /// Parses a provider name as found in the environment.
    fn parse(name: &str) -> AppResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "ollama" => Ok(ModelProvider::Ollama),
            "openai" => Ok(ModelProvider::OpenAi),
            other => Err(AppError::Config(format!(
                "Unknown model provider '{}'. Supported providers: ollama, openai",
                other
            ))),
        }
    }

    /// Default base URL for this provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ModelProvider::Ollama => DEFAULT_OLLAMA_URL,
            ModelProvider::OpenAi => DEFAULT_OPENAI_URL,
        }
    }

    /// Default chat model for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            ModelProvider::Ollama => DEFAULT_OLLAMA_MODEL,
            ModelProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Configuration for the ruminate application.
///
/// Holds everything the model client needs: which provider to talk to, which
/// model to request, the credential (if any), and transport parameters.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use ruminate::config::{Config, ModelProvider};
///
/// let config = Config {
///     provider: ModelProvider::Ollama,
///     model: "llama3.2:3b".to_string(),
///     base_url: "http://127.0.0.1:11434".to_string(),
///     api_key: None,
///     temperature: 0.7,
///     timeout_secs: 120,
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Which provider backend to call.
    pub provider: ModelProvider,
    /// Model name to request from the provider.
    pub model: String,
    /// Base URL of the provider API.
    pub base_url: String,
    /// API key for key-requiring providers. `None` for Ollama.
    pub api_key: Option<String>,
    /// Sampling temperature passed with each request.
    pub temperature: f32,
    /// Transport-level request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED_PLACEHOLDER))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ModelProvider::Ollama,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - `RUMINATE_PROVIDER` names an unknown provider
    /// - `RUMINATE_TEMPERATURE` or `RUMINATE_TIMEOUT_SECS` fail to parse
    ///
    /// Missing credentials are reported by [`Config::validate`], which is the
    /// startup gate for fatal configuration failures.
    pub fn load() -> AppResult<Self> {
        let provider = match env::var(ENV_VAR_PROVIDER) {
            Ok(name) => ModelProvider::parse(&name)?,
            Err(_) => ModelProvider::Ollama,
        };

        let model =
            env::var(ENV_VAR_MODEL).unwrap_or_else(|_| provider.default_model().to_string());

        let base_url =
            env::var(ENV_VAR_BASE_URL).unwrap_or_else(|_| provider.default_base_url().to_string());

        let api_key = env::var(ENV_VAR_API_KEY).ok().filter(|k| !k.is_empty());

        let temperature = match env::var(ENV_VAR_TEMPERATURE) {
            Ok(raw) => raw.parse::<f32>().map_err(|e| {
                AppError::Config(format!("Invalid {}: {}", ENV_VAR_TEMPERATURE, e))
            })?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match env::var(ENV_VAR_TIMEOUT_SECS) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid {}: {}", ENV_VAR_TIMEOUT_SECS, e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            provider,
            model,
            base_url,
            api_key,
            temperature,
            timeout_secs,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// This is the startup gate for fatal configuration failures: a missing
    /// credential aborts the whole run here, before any pipeline work or
    /// dataset item is scheduled.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The model name or base URL is empty
    /// - The provider is OpenAI and no API key is set
    /// - The temperature is not a finite number
    /// - The timeout is zero
    pub fn validate(&self) -> AppResult<()> {
        if self.model.is_empty() {
            return Err(AppError::Config("Model name is empty".to_string()));
        }

        if self.base_url.is_empty() {
            return Err(AppError::Config("Base URL is empty".to_string()));
        }

        if self.provider == ModelProvider::OpenAi && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "Provider 'openai' requires an API key. Set the {} environment variable",
                ENV_VAR_API_KEY
            )));
        }

        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(AppError::Config(format!(
                "Temperature must be a non-negative finite number, got {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var(ENV_VAR_PROVIDER);
        env::remove_var(ENV_VAR_MODEL);
        env::remove_var(ENV_VAR_BASE_URL);
        env::remove_var(ENV_VAR_API_KEY);
        env::remove_var(ENV_VAR_TEMPERATURE);
        env::remove_var(ENV_VAR_TIMEOUT_SECS);
    }

    #[test]
    fn test_debug_impl_redacts_api_key() {
        let config = Config {
            provider: ModelProvider::OpenAi,
            api_key: Some("sk-secret-key".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
        assert!(!debug_output.contains("sk-secret-key"));
    }

    #[test]
    #[serial]
    fn test_load_defaults_to_ollama() {
        clear_env();

        let config = Config::load().unwrap();
        assert_eq!(config.provider, ModelProvider::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.base_url, DEFAULT_OLLAMA_URL);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_openai_provider() {
        clear_env();
        env::set_var(ENV_VAR_PROVIDER, "openai");
        env::set_var(ENV_VAR_API_KEY, "sk-test");

        let config = Config::load().unwrap();
        clear_env();

        assert_eq!(config.provider, ModelProvider::OpenAi);
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_unknown_provider() {
        clear_env();
        env::set_var(ENV_VAR_PROVIDER, "mainframe");

        let result = Config::load();
        clear_env();

        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("Unknown model provider")),
            _ => panic!("Expected Config error for unknown provider"),
        }
    }

    #[test]
    #[serial]
    fn test_load_invalid_temperature() {
        clear_env();
        env::set_var(ENV_VAR_TEMPERATURE, "warm");

        let result = Config::load();
        clear_env();

        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains(ENV_VAR_TEMPERATURE)),
            _ => panic!("Expected Config error for invalid temperature"),
        }
    }

    #[test]
    fn test_validate_openai_missing_key_is_fatal() {
        let config = Config {
            provider: ModelProvider::OpenAi,
            api_key: None,
            ..Config::default()
        };

        let result = config.validate();
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("requires an API key")),
            _ => panic!("Expected Config error for missing API key"),
        }
    }

    #[test]
    fn test_validate_empty_model() {
        let config = Config {
            model: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_finite_temperature() {
        let config = Config {
            temperature: f32::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
