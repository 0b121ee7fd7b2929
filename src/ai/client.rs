//! Blocking HTTP client for the configured model provider.
//!
//! Supports two wire formats: the Ollama chat API and OpenAI-compatible chat
//! completions. Both speak the same [`Message`] type; the difference is the
//! endpoint, the authentication header, and where the reply content lives in
//! the response body.

use crate::config::{Config, ModelProvider};
use crate::errors::{AiError, AppResult};
use crate::extract::Schema;
use crate::ai::TextGenerator;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from the Ollama chat endpoint.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

/// Response from an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Message,
}

/// Client for the configured model provider.
pub struct ModelClient {
    provider: ModelProvider,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    client: Client,
}

impl ModelClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AiError::Offline)?;

        Ok(Self {
            provider: config.provider,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            client,
        })
    }

    /// Sends a chat request, optionally with a schema for guided decoding.
    fn chat(&self, messages: &[Message], schema: Option<&Schema>) -> AppResult<String> {
        match self.provider {
            ModelProvider::Ollama => self.chat_ollama(messages, schema),
            ModelProvider::OpenAi => self.chat_openai(messages, schema),
        }
    }

    fn chat_ollama(&self, messages: &[Message], schema: Option<&Schema>) -> AppResult<String> {
        debug!("Sending Ollama chat request with model: {}", self.model);

        let url = format!("{}/api/chat", self.base_url);
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": {"temperature": self.temperature},
        });
        if let Some(schema) = schema {
            body["format"] = schema.to_json_schema();
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(AiError::Offline)?;

        if !response.status().is_success() {
            return Err(self.status_error(response).into());
        }

        let chat_response: OllamaChatResponse = response.json().map_err(|e| {
            AiError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        debug!("Received Ollama chat response");
        Ok(chat_response.message.content)
    }

    fn chat_openai(&self, messages: &[Message], schema: Option<&Schema>) -> AppResult<String> {
        debug!("Sending OpenAI chat request with model: {}", self.model);

        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        if schema.is_some() {
            body["response_format"] = json!({"type": "json_object"});
        }

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(AiError::Offline)?;

        if !response.status().is_success() {
            return Err(self.status_error(response).into());
        }

        let chat_response: OpenAiChatResponse = response.json().map_err(|e| {
            AiError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::InvalidResponse("response contained no choices".to_string()))?;

        debug!("Received OpenAI chat response");
        Ok(choice.message.content)
    }

    /// Maps a non-success HTTP status to an [`AiError`].
    fn status_error(&self, response: reqwest::blocking::Response) -> AiError {
        let status = response.status();
        let error_text = response.text().unwrap_or_default();

        if status.as_u16() == 404 {
            // Ollama reports unknown models as 404 with a JSON error body.
            let is_model_error = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|v| v.get("error").map(|e| e.is_string()))
                .unwrap_or(false);
            if is_model_error || self.provider == ModelProvider::Ollama {
                return AiError::ModelNotFound(self.model.clone());
            }
        }

        AiError::InvalidResponse(format!("HTTP {}: {}", status, error_text))
    }
}

impl TextGenerator for ModelClient {
    fn complete(&self, messages: &[Message]) -> AppResult<String> {
        self.chat(messages, None)
    }

    fn complete_structured(&self, messages: &[Message], schema: &Schema) -> AppResult<String> {
        self.chat(messages, Some(schema))
    }
}
