//! Constants used throughout the application.
//!
//! This module contains all constants used in the ruminate application,
//! organized into logical groups. Having constants centralized makes them
//! easier to find, modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "ruminate";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "Analyze journal entries and build fine-tuning datasets with an LLM pipeline";

// Configuration Keys & Environment Variables
/// Environment variable selecting the model provider ("ollama" or "openai").
pub const ENV_VAR_PROVIDER: &str = "RUMINATE_PROVIDER";
/// Environment variable naming the model to use.
pub const ENV_VAR_MODEL: &str = "RUMINATE_MODEL";
/// Environment variable overriding the provider base URL.
pub const ENV_VAR_BASE_URL: &str = "RUMINATE_BASE_URL";
/// Environment variable holding the API key for key-requiring providers.
pub const ENV_VAR_API_KEY: &str = "RUMINATE_API_KEY";
/// Environment variable overriding the sampling temperature.
pub const ENV_VAR_TEMPERATURE: &str = "RUMINATE_TEMPERATURE";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_VAR_TIMEOUT_SECS: &str = "RUMINATE_TIMEOUT_SECS";

// Provider Defaults
/// Default base URL for the Ollama provider.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default base URL for the OpenAI-compatible provider.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
/// Default chat model for the Ollama provider.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
/// Default chat model for the OpenAI-compatible provider.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature for model calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default transport-level request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// Pipeline Defaults
/// Topic substituted when an upstream topic list is empty.
pub const DEFAULT_TOPIC: &str = "general";
/// Importance score assigned to fallback topics (out of 10).
pub const DEFAULT_TOPIC_IMPORTANCE: f64 = 5.0;
/// Mood score used when mood analysis falls back.
pub const FALLBACK_MOOD_SCORE: f64 = 0.0;
/// Number of reflection questions each analysis must produce.
pub const QUESTION_COUNT: usize = 5;

// Dataset Builder Defaults
/// Default number of concurrent workers for dataset generation.
pub const DEFAULT_WORKERS: usize = 5;
/// Default output path for the generated dataset.
pub const DEFAULT_DATASET_OUT: &str = "train.jsonl";
/// Default output path for a rendered analysis.
pub const DEFAULT_ANALYSIS_OUT: &str = "journal_analysis.md";

// Validation
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";
