//! Generation dispatcher — prompt in, parsed JSON out.
//!
//! One call to [`Dispatcher::generate`] resolves the provider and model,
//! makes exactly one chat-completion request, strips a Markdown code fence
//! the model may have wrapped its answer in, and parses what is left.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use copyflow_core::types::Message;
use copyflow_core::utils::truncate_string;

use crate::error::GenerationError;
use crate::http_provider::HttpProvider;
use crate::registry::{Provider, ProviderRegistry};
use crate::traits::{LlmProvider, LlmRequestConfig};

const FENCE: &str = "```";

/// Resolves providers from the registry and runs single-shot generations.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    client: reqwest::Client,
}

impl Dispatcher {
    /// Create a dispatcher whose upstream calls time out after `timeout`.
    pub fn new(registry: Arc<ProviderRegistry>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { registry, client })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Send `prompt` to `model_id` at `provider_id` and parse the answer as JSON.
    ///
    /// `max_tokens` is clamped to the model's declared maximum. The returned
    /// value is not checked against any schema.
    pub async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        provider_id: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<serde_json::Value, GenerationError> {
        let provider = self.resolve_provider(provider_id)?;
        let model = provider
            .model(model_id)
            .ok_or_else(|| GenerationError::UnknownModel {
                provider: provider_id.to_string(),
                model: model_id.to_string(),
            })?;

        let config = LlmRequestConfig {
            max_tokens: max_tokens.min(model.max_tokens),
            temperature,
        };

        debug!(
            provider = %provider.id,
            model = %model.id,
            requested_tokens = max_tokens,
            max_tokens = config.max_tokens,
            prompt = %truncate_string(prompt.trim(), 60),
            "Dispatching generation"
        );

        let llm = HttpProvider::new(self.client.clone(), provider);
        let response = llm
            .chat(&[Message::user(prompt)], &model.id, &config)
            .await?;

        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        extract_json(text).inspect_err(|e| {
            warn!(
                provider = %provider.id,
                model = %model.id,
                error = %e,
                answer = %truncate_string(text, 200),
                "Model answer is not valid JSON"
            );
        })
    }

    /// Look up a provider that can actually be called.
    fn resolve_provider(&self, provider_id: &str) -> Result<&Provider, GenerationError> {
        let provider = self
            .registry
            .get(provider_id)
            .ok_or_else(|| GenerationError::UnknownProvider(provider_id.to_string()))?;
        if !provider.is_available() {
            return Err(GenerationError::MissingCredential(provider.name.clone()));
        }
        Ok(provider)
    }
}

// ─────────────────────────────────────────────
// Answer post-processing
// ─────────────────────────────────────────────

/// Trim `text` and, if it opens with a code fence, drop the opening fence
/// line (with or without a language tag) and the closing fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    // A language tag is a single word running to the end of the fence line.
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = match rest[tag_len..].chars().next() {
        Some(c) if c.is_whitespace() => &rest[tag_len..],
        // `json` may run straight into the payload: ```json{...}```
        _ if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) => &rest[4..],
        _ => rest,
    };

    let body = body.trim();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Strip any code fence and parse the remainder as JSON.
pub fn extract_json(text: &str) -> Result<serde_json::Value, GenerationError> {
    serde_json::from_str(strip_code_fence(text)).map_err(GenerationError::MalformedResponse)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use copyflow_core::config::schema::ProvidersConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher_for(deepseek_key: &str, api_base: Option<&str>) -> Dispatcher {
        let mut config = ProvidersConfig::default();
        config.deepseek.api_key = deepseek_key.to_string();
        config.deepseek.api_base = api_base.map(String::from);
        config.openai.api_key = "sk-openai".to_string();
        config.openai.api_base = api_base.map(String::from);
        let registry = Arc::new(ProviderRegistry::from_config(&config));
        Dispatcher::new(registry, Duration::from_secs(5)).unwrap()
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{ "message": { "content": content }, "finish_reason": "stop" }],
            "usage": null
        }))
    }

    // ── strip_code_fence / extract_json ──

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_strip_fence_other_language_tag() {
        assert_eq!(strip_code_fence("```JSON\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json5 \n{}\n```"), "{}");
    }

    #[test]
    fn test_strip_fence_on_one_line() {
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_tag_without_whitespace() {
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON[1, 2]\n```"), "[1, 2]");
        assert_eq!(extract_json("```json{\"a\":1}```").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_strip_fence_without_closing() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_no_fence_is_only_trimmed() {
        assert_eq!(strip_code_fence("  \n{\"a\": 1}\n "), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let body = r#"{"topics":[{"title":"T","description":"D","reason":"R"}]}"#;
        let fenced = format!("```json\n{body}\n```");
        let bare = format!("```\n{body}\n```");

        let plain = extract_json(body).unwrap();
        assert_eq!(extract_json(&fenced).unwrap(), plain);
        assert_eq!(extract_json(&bare).unwrap(), plain);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        for text in ["{\"topics\": [", "```json\nnot json\n```", "当然可以！以下是选题：", ""] {
            let err = extract_json(text).unwrap_err();
            assert!(
                matches!(err, GenerationError::MalformedResponse(_)),
                "{text:?} gave {err:?}"
            );
        }
    }

    // ── generate: failures before any network call ──

    #[tokio::test]
    async fn test_unknown_provider_makes_no_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "anthropic", 0.7, 2000)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::UnknownProvider(ref id) if id == "anthropic"));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MissingCredential(ref name) if name == "DeepSeek"));
    }

    #[tokio::test]
    async fn test_model_of_other_provider_is_unknown() {
        let dispatcher = dispatcher_for("ds-key", Some("http://127.0.0.1:1"));
        let err = dispatcher
            .generate("prompt", "gpt-4", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();

        match err {
            GenerationError::UnknownModel { provider, model } => {
                assert_eq!(provider, "deepseek");
                assert_eq!(model, "gpt-4");
            }
            other => panic!("expected UnknownModel, got {other:?}"),
        }
    }

    // ── generate: round trips ──

    #[tokio::test]
    async fn test_token_budget_is_clamped() {
        // (model, provider, requested, expected)
        let cases = [
            ("deepseek-chat", "deepseek", 3000, 3000),
            ("deepseek-chat", "deepseek", 8000, 4096),
            ("gpt-4", "openai", 6000, 6000),
            ("gpt-4", "openai", 9000, 8192),
            ("gpt-3.5-turbo", "openai", 1, 1),
        ];

        for (model, provider, requested, expected) in cases {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(body_partial_json(json!({ "model": model, "max_tokens": expected })))
                .respond_with(completion("{\"ok\": true}"))
                .expect(1)
                .mount(&mock_server)
                .await;

            let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
            let value = dispatcher
                .generate("prompt", model, provider, 0.7, requested)
                .await
                .unwrap();
            assert_eq!(value, json!({"ok": true}));
        }
    }

    #[tokio::test]
    async fn test_generate_parses_fenced_answer() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "temperature": 0.8,
                "messages": [{ "role": "user", "content": "给我选题" }]
            })))
            .respond_with(completion(
                "```json\n{\"topics\":[{\"title\":\"T\",\"description\":\"D\",\"reason\":\"R\"}]}\n```",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let value = dispatcher
            .generate("给我选题", "deepseek-chat", "deepseek", 0.8, 2000)
            .await
            .unwrap();

        assert_eq!(value["topics"][0]["title"], "T");
        assert_eq!(value["topics"][0]["reason"], "R");
    }

    #[tokio::test]
    async fn test_generate_empty_answer() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(""))
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_no_choices() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})))
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_malformed_answer() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("好的，这是您要的选题：1. ..."))
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_upstream_error_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = dispatcher_for("ds-key", Some(&mock_server.uri()));
        let err = dispatcher
            .generate("prompt", "deepseek-chat", "deepseek", 0.7, 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(ref msg) if msg.contains("upstream down")));
    }
}
