//! Generic HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint (OpenAI, DeepSeek,
//! or a self-hosted proxy) through a shared `reqwest::Client`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use copyflow_core::types::{ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message};

use crate::error::GenerationError;
use crate::registry::Provider;
use crate::traits::{LlmProvider, LlmRequestConfig};

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// An LLM provider bound to one registry entry's credential and endpoint.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.deepseek.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Provider display name, for logs.
    display_name: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Bind a shared client to `provider`'s endpoint and credential.
    pub fn new(client: reqwest::Client, provider: &Provider) -> Self {
        let mut extra_headers = HeaderMap::new();
        for (key, value) in provider.extra_headers() {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                extra_headers.insert(name, val);
            } else {
                warn!(provider = %provider.id, header = %key, "Invalid extra header, skipping");
            }
        }

        HttpProvider {
            client,
            api_base: provider.api_base().to_string(),
            api_key: provider.api_key().to_string(),
            extra_headers,
            display_name: provider.name.clone(),
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, GenerationError> {
        debug!(
            provider = %self.display_name,
            model = %model,
            messages = messages.len(),
            max_tokens = config.max_tokens,
            temperature = config.temperature,
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = %self.display_name, error = %e, "HTTP request failed");
                GenerationError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = %self.display_name,
                status = %status,
                body = %error_text,
                "API error"
            );
            return Err(GenerationError::Transport(format!("{} — {}", status, error_text)));
        }

        let chat_resp = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(provider = %self.display_name, error = %e, "Failed to parse LLM response");
                GenerationError::Transport(format!("invalid completion body: {}", e))
            })?;

        let llm_resp: LlmResponse = chat_resp.into();
        debug!(
            provider = %self.display_name,
            has_content = llm_resp.content.is_some(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            total_tokens = llm_resp.usage.as_ref().map_or(0, |u| u.total_tokens),
            "LLM response received"
        );
        Ok(llm_resp)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
