//! Generative backend client
//!
//! A single fallible call per pipeline invocation. Retry policy, if any,
//! belongs to the transport layer above this crate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::PackmateError;
use crate::prompt::PromptPayload;

/// Sampling temperature; kept low for consistent list structure
const TEMPERATURE: f64 = 0.4;

/// A backend that turns a prompt payload into raw packing-list text.
///
/// Implementations are injected into the pipeline so tests can substitute
/// deterministic fakes.
#[async_trait]
pub trait PackingListGenerator: Send + Sync {
    /// Invoke the backend once. An empty payload is a fatal error.
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, PackmateError>;
}

/// Chat-completions client for an OpenAI-compatible backend
#[derive(Debug)]
pub struct OpenAiGenerator {
    model: String,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    http: Client,
}

impl OpenAiGenerator {
    /// Create a client from configuration. Requires an API key.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, PackmateError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PackmateError::config("Generator API key is not configured"))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(|e| PackmateError::generation(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            http,
        })
    }

    fn build_request_body(&self, prompt: &PromptPayload) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": TEMPERATURE,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": prompt.instructions },
                { "role": "user", "content": prompt.context },
            ],
        })
    }
}

#[async_trait]
impl PackingListGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, PackmateError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, "Requesting packing list generation");

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| PackmateError::generation(format!("Backend request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PackmateError::generation(format!(
                "Backend returned HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| PackmateError::generation(format!("Failed to parse backend response: {e}")))?;

        let raw = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| PackmateError::generation("Backend returned an empty response"))?;

        debug!(chars = raw.len(), "Received generator output");
        Ok(raw)
    }
}

// Chat-completions API response types

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(base_url: String) -> GeneratorConfig {
        GeneratorConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2048,
            timeout_seconds: 5,
        }
    }

    fn payload() -> PromptPayload {
        PromptPayload {
            instructions: "system directive".to_string(),
            context: "trip context".to_string(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let generator = OpenAiGenerator::from_config(&config("http://localhost".to_string())).unwrap();
        let body = generator.build_request_body(&payload());
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "system directive");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "trip context");
    }

    #[tokio::test]
    async fn test_generate_returns_message_content() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "choices": [
                        { "message": { "content": "{\"Clothing\":[]}" } }
                    ]
                }));
            })
            .await;

        let generator = OpenAiGenerator::from_config(&config(server.base_url())).unwrap();
        let raw = generator.generate(&payload()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(raw, "{\"Clothing\":[]}");
    }

    #[tokio::test]
    async fn test_empty_content_is_fatal() {
        let server = httpmock::MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [ { "message": { "content": "" } } ]
                }));
            })
            .await;

        let generator = OpenAiGenerator::from_config(&config(server.base_url())).unwrap();
        let err = generator.generate(&payload()).await.unwrap_err();
        assert!(matches!(err, PackmateError::Generation { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_http_error_is_fatal_without_retry() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST).path("/v1/chat/completions");
                then.status(500).body("internal error");
            })
            .await;

        let generator = OpenAiGenerator::from_config(&config(server.base_url())).unwrap();
        let err = generator.generate(&payload()).await.unwrap_err();
        assert!(matches!(err, PackmateError::Generation { .. }));
        // Exactly one call: no internal retry
        mock.assert_async().await;
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let mut c = config("http://localhost".to_string());
        c.api_key = None;
        let err = OpenAiGenerator::from_config(&c).unwrap_err();
        assert!(matches!(err, PackmateError::Config { .. }));
    }
}
