use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::types::{ChatMessage, ChatReply, CompletionRequest, CompletionResponse};
use crate::config::{LlmConfig, RequestConfig};
use crate::error::{LlmError, LlmResult};

/// Chat completion interface consumed by the backcasting engine.
///
/// One ordered message sequence in, one assistant reply out. The engine
/// sends exactly one system message plus one user message per call and
/// never does multi-turn exchange internally.
#[async_trait]
pub trait LlmChat: Send + Sync {
    async fn send_message(&self, messages: &[ChatMessage]) -> LlmResult<ChatReply>;
}

/// HTTP client for an OpenAI-compatible chat completions API
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    request_config: RequestConfig,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: &LlmConfig, request_config: RequestConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a single request (internal)
    async fn execute_request(&self, url: &str, messages: &[ChatMessage]) -> LlmResult<ChatReply> {
        debug!(
            model = %self.model,
            messages = messages.len(),
            "Calling chat completions"
        );

        let body = CompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| LlmError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse {
                message: "Response contained no choices".to_string(),
            })?;

        Ok(ChatReply {
            content: choice.message.content,
            usage: completion.usage,
        })
    }
}

#[async_trait]
impl LlmChat for ChatClient {
    async fn send_message(&self, messages: &[ChatMessage]) -> LlmResult<ChatReply> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = Duration::from_millis(
                    self.request_config.retry_delay_ms * (2_u64.pow(retries - 1)),
                );
                warn!(
                    model = %self.model,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying chat request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(&url, messages).await {
                Ok(reply) => {
                    let latency = start.elapsed();
                    info!(
                        model = %self.model,
                        latency_ms = latency.as_millis(),
                        "Chat completion succeeded"
                    );
                    return Ok(reply);
                }
                Err(e) => {
                    let latency = start.elapsed();
                    error!(
                        model = %self.model,
                        error = %e,
                        latency_ms = latency.as_millis(),
                        retry = retries,
                        "Chat completion failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(LlmError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = LlmConfig {
            api_key: "test_key".to_string(),
            base_url: "https://api.openai.com/".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        };

        let client = ChatClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com");
    }
}
