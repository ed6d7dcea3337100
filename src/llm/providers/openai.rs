//! OpenAI API Provider
//!
//! This module implements the LLMProvider trait for OpenAI-compatible
//! chat-completions endpoints.

use crate::error::{FaersSqlError, Result};
use crate::llm::client::LLMHttpClient;
use crate::llm::provider::{GenerationParams, LLMProvider, LLMResponse, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI chat completions endpoint
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is given
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const PROVIDER_NAME: &str = "OpenAI";

/// OpenAI GPT API provider
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: LLMHttpClient,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - Model identifier (defaults to gpt-4o-mini)
    /// * `timeout_secs` - Per-request HTTP timeout
    pub fn new(api_key: impl Into<String>, model: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: OPENAI_API_BASE.to_string(),
            client: LLMHttpClient::with_timeout(timeout_secs)?,
        })
    }

    /// Point the provider at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The model this provider sends requests for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The endpoint requests are posted to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, messages: &[Message], params: Option<&GenerationParams>) -> OpenAIRequest {
        let defaults = GenerationParams::default();
        let params = params.unwrap_or(&defaults);

        OpenAIRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|msg| OpenAIMessage {
                    role: msg.role.as_str().to_string(),
                    content: msg.content.clone(),
                })
                .collect(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            stop: params.stop_sequences.clone(),
        }
    }
}

/// Turn a raw chat-completions body into an `LLMResponse`
fn parse_response(body: &str) -> Result<LLMResponse> {
    let response: OpenAIResponse =
        serde_json::from_str(body).map_err(|e| FaersSqlError::LLMApiError {
            provider: PROVIDER_NAME.to_string(),
            message: format!("Failed to parse response: {}", e),
            status: 0,
        })?;

    let choice = response.choices.into_iter().next();
    Ok(LLMResponse {
        content: choice
            .as_ref()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default(),
        input_tokens: response.usage.as_ref().map(|u| u.prompt_tokens),
        output_tokens: response.usage.as_ref().map(|u| u.completion_tokens),
        model: response.model,
        finish_reason: choice.and_then(|c| c.finish_reason),
    })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn generate(
        &self,
        messages: &[Message],
        params: Option<&GenerationParams>,
    ) -> Result<LLMResponse> {
        self.validate_config()?;

        let request = self.build_request(messages, params);
        let headers = LLMHttpClient::bearer_headers(&self.api_key)?;

        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion");
        let body = self
            .client
            .post_with_retry(PROVIDER_NAME, &self.base_url, headers, &request)
            .await?;

        let response = parse_response(&body)?;
        tracing::debug!(
            tokens = ?response.total_tokens(),
            finish_reason = ?response.finish_reason,
            "chat completion received"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

/// OpenAI API message format
#[derive(Debug, Serialize, Clone)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: OpenAIMessageResponse,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
