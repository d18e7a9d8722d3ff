//! Chat completion client
//!
//! [`LLMClient`] is the seam between the tutor and the model provider. The
//! production implementation talks to an Azure OpenAI deployment; tests swap
//! in a scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::models::{ChatMessage, CompletionRequest, LLMError};
use crate::config::AzureConfig;

#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one chat completion and return the trimmed reply text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LLMError>;
}

// ============================================================================
// Azure OpenAI
// ============================================================================

/// Azure OpenAI chat completions client
///
/// Does not derive Debug so the API key cannot end up in logs.
pub struct AzureOpenAIClient {
    http_client: Client,
    api_key: String,
    completions_url: String,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAIClient {
    pub fn new(config: &AzureConfig) -> Result<Self, LLMError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            completions_url: Self::build_completions_url(config),
        })
    }

    fn build_completions_url(config: &AzureConfig) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.trim_end_matches('/'),
            config.deployment_name,
            config.api_version
        )
    }

    fn status_error(status: StatusCode, body: String) -> LLMError {
        let message = format!("{}: {}", status, body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::Unauthorized(message),
            StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                LLMError::Timeout(message)
            },
            _ => LLMError::ApiError(message),
        }
    }
}

#[async_trait]
impl LLMClient for AzureOpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LLMError> {
        let scenario = request.scenario.as_str();
        tracing::debug!(
            "Sending {} request to Azure OpenAI ({} messages)",
            scenario,
            request.messages.len()
        );

        let body = ChatCompletionBody {
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http_client
            .post(&self.completions_url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Azure OpenAI {} request failed: {}", scenario, e);
                LLMError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Azure OpenAI {} returned {}: {}", scenario, status, error_text);
            return Err(Self::status_error(status, error_text));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LLMError::EmptyResponse)?;

        tracing::debug!(
            "Received {} response: {}",
            scenario,
            content.chars().take(100).collect::<String>()
        );
        Ok(content)
    }
}
