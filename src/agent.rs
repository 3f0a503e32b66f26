//! LLM provider adapters for structured generation.
//!
//! Gemini goes through rstructor; OpenAI and Ollama are called over their
//! chat endpoints with reqwest.

use crate::config::{Config, Provider};
use crate::error::UpstreamError;
use crate::llm::{GenerationRequest, StructuredGenerator};
use async_trait::async_trait;
use reqwest::Client;
use rstructor::{GeminiClient, GeminiModel, LLMClient};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("decksmith/", env!("CARGO_PKG_VERSION"));

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("failed to build LLM client: {0}")]
    ClientError(String),
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// System instructions with the schema contract appended, for providers
/// that take the schema as prompt text.
fn system_with_schema(request: &GenerationRequest) -> String {
    format!(
        "{}\n\nFollow this JSON schema while giving out response:\n{}\n\nMake descriptions short and obey the character limits. Output should be in JSON format. Give out only JSON, nothing else.",
        request.system,
        request.schema_text()
    )
}

/// Gemini through rstructor.
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AgentError> {
        let client = GeminiClient::new(api_key)
            .map_err(|e| AgentError::ClientError(e.to_string()))?
            .model(parse_gemini_model(model));
        Ok(Self { client })
    }
}

#[async_trait]
impl StructuredGenerator for GeminiGenerator {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        // Gemini takes a single prompt: instructions, schema, then the payload
        let prompt = format!(
            "{}\n\nDo not include any markdown formatting, code blocks, or explanations. Only output the raw JSON object.\n\n---\n\n{}",
            system_with_schema(request),
            request.user_message()
        );

        let result = self
            .client
            .generate_with_metadata(&prompt)
            .await
            .map_err(|e| UpstreamError::new(format!("gemini: {e}")))?;

        Ok(result.text)
    }
}

/// Parse a model string into a GeminiModel
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        other => {
            log::warn!("unknown gemini model {other}, using gemini-2.0-flash");
            GeminiModel::Gemini20Flash
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

fn chat_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: system_with_schema(request),
        },
        ChatMessage {
            role: "user",
            content: request.user_message(),
        },
    ]
}

/// Create a configured HTTP client for provider calls
fn create_client(timeout: Duration) -> Result<Client, AgentError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| AgentError::ClientError(e.to_string()))
}

async fn post_json(
    request: reqwest::RequestBuilder,
    body: &Value,
    provider: &str,
) -> Result<Value, UpstreamError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| UpstreamError::new(format!("{provider}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(UpstreamError::new(format!("{provider}: HTTP {status}: {detail}")));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| UpstreamError::new(format!("{provider}: invalid response body: {e}")))
}

/// OpenAI chat completions in JSON mode.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, AgentError> {
        Ok(Self {
            client: create_client(timeout)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl StructuredGenerator for OpenAiGenerator {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(request),
            "response_format": {"type": "json_object"},
        });

        let value = post_json(
            self.client.post(OPENAI_CHAT_URL).bearer_auth(&self.api_key),
            &body,
            "openai",
        )
        .await?;

        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::new("openai: response has no message content"))
    }
}

/// Ollama chat endpoint with the schema passed as `format`.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, AgentError> {
        Ok(Self {
            client: create_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl StructuredGenerator for OllamaGenerator {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(request),
            "format": request.schema,
            "stream": false,
        });

        let url = format!("{}/api/chat", self.base_url);
        let value = post_json(self.client.post(url), &body, "ollama").await?;
        let response: OllamaResponse = serde_json::from_value(value)
            .map_err(|e| UpstreamError::new(format!("ollama: unexpected response: {e}")))?;
        Ok(response.message.content)
    }
}

/// Build the generator for `model` from the configured provider.
pub fn build_generator(
    config: &Config,
    model: &str,
) -> Result<Arc<dyn StructuredGenerator>, AgentError> {
    let timeout = Duration::from_secs(config.llm.timeout_secs);
    let api_key = config.api_key()?.unwrap_or_default();
    log::info!("using {} model {}", config.llm.provider, model);

    Ok(match config.llm.provider {
        Provider::Gemini => Arc::new(GeminiGenerator::new(api_key, model)?),
        Provider::OpenAi => Arc::new(OpenAiGenerator::new(api_key, model, timeout)?),
        Provider::Ollama => Arc::new(OllamaGenerator::new(
            &config.llm.ollama_url,
            model,
            timeout,
        )?),
    })
}
