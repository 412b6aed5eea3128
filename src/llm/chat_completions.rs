// file: src/llm/chat_completions.rs
// description: structured generation over OpenAI-compatible chat completion endpoints
// reference: https://console.groq.com/docs/structured-outputs

use crate::config::ModelConfig;
use crate::error::GenerationError;
use crate::llm::generator::{GenerationRequest, StructuredGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

pub struct ChatCompletionsGenerator {
    client: Client,
    config: ModelConfig,
}

impl ChatCompletionsGenerator {
    pub fn new(config: ModelConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ModelConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_body(&self, request: &GenerationRequest<'_>) -> Value {
        let messages = [
            ChatMessage {
                role: "system",
                content: request.system,
            },
            ChatMessage {
                role: "user",
                content: request.prompt,
            },
        ];

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name,
                    "strict": request.schema.strict,
                    "schema": request.schema.schema,
                }
            }
        });

        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }

    fn parse_response(response: ChatCompletionResponse) -> Result<Value, GenerationError> {
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(GenerationError::EmptyResponse)?;

        if let Some(refusal) = message.refusal {
            return Err(GenerationError::MalformedOutput(format!(
                "Model refused to answer: {}",
                refusal
            )));
        }

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        let value: Value = serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
            GenerationError::MalformedOutput(format!("Response is not valid JSON: {}", e))
        })?;

        if !value.is_object() {
            return Err(GenerationError::MalformedOutput(
                "Response is not a JSON object".to_string(),
            ));
        }

        Ok(value)
    }
}

// Some models wrap JSON answers in markdown fences even in structured mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

impl fmt::Debug for ChatCompletionsGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsGenerator")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StructuredGenerator for ChatCompletionsGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Value, GenerationError> {
        let body = self.build_body(&request);

        debug!(
            "Requesting structured output from {} ({} system chars, schema {})",
            self.config.model,
            request.system.len(),
            request.schema.name
        );

        let mut builder = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body);

        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            GenerationError::Transport(format!("Failed to send chat completion request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationError::MalformedOutput(format!("Failed to parse chat completion: {}", e))
        })?;

        Self::parse_response(parsed)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
