use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::models::*;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Sends one prompt to a language model and returns the generated text.
///
/// Implementations make exactly one attempt; callers decide what to do with failures.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, AnalyzerError>;
}

/// OpenAI-compatible Chat Completions client.
pub struct OpenAiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiService {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        if config.api_key.trim().is_empty() {
            return Err(AnalyzerError::ProviderConfig(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.provider_timeout)
            .user_agent("pdf-analyzer/0.1")
            .build()
            .map_err(|e| AnalyzerError::ProviderConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout: config.provider_timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> AnalyzerError {
        if error.is_timeout() {
            AnalyzerError::ProviderTimeout(format!(
                "no response within {} seconds",
                self.timeout.as_secs_f32()
            ))
        } else {
            AnalyzerError::ProviderCall(format!("failed to reach {}: {error}", self.base_url))
        }
    }
}

#[async_trait]
impl Completer for OpenAiService {
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, AnalyzerError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        log::info!(
            "Requesting completion from model {} (max_tokens={})",
            self.model,
            prompt.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Completion provider rejected credentials: {}", status);
            return Err(AnalyzerError::ProviderConfig(format!(
                "provider rejected the API key ({status}): {error_text}"
            )));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Completion provider returned {}", status);
            return Err(AnalyzerError::ProviderCall(format!(
                "provider returned {status}: {error_text}"
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport_error(e)
            } else {
                AnalyzerError::FormattingAnomaly(format!("malformed completion response: {e}"))
            }
        })?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AnalyzerError::FormattingAnomaly("response contained no completion".to_string())
            })?;

        Ok(answer)
    }
}
