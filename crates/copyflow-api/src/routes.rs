//! Router and handlers.
//!
//! | Method | Path                    | Handler            |
//! |--------|-------------------------|--------------------|
//! | POST   | `/api/generate/topics`  | [`generate_topics`] |
//! | POST   | `/api/generate/script`  | [`generate_script`] |
//! | POST   | `/api/generate/copy`    | [`generate_copy`]   |
//! | GET    | `/api/providers/status` | [`provider_status`] |
//! | GET    | `/api/options`          | [`options`]         |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Serialize, Serializer};
use tracing::{error, warn};

use copyflow_core::content::{CopyResponse, ScriptResponse, TopicsResponse};
use copyflow_providers::Model;
use copyflow_studio::catalog::{TagCategory, DURATIONS, PLATFORMS, STYLES, TAG_CATEGORIES};
use copyflow_studio::{CopyRequest, ScriptRequest, StudioError, TopicsRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate/topics", post(generate_topics))
        .route("/api/generate/script", post(generate_script))
        .route("/api/generate/copy", post(generate_copy))
        .route("/api/providers/status", get(provider_status))
        .route("/api/options", get(options))
        .with_state(state)
}

// ─────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────

/// Client-facing messages of one generation endpoint.
struct Endpoint {
    name: &'static str,
    missing_input: &'static str,
    failure: &'static str,
}

const TOPICS: Endpoint = Endpoint {
    name: "topics",
    missing_input: "请提供有效的标签",
    failure: "生成选题失败，请重试",
};

const SCRIPT: Endpoint = Endpoint {
    name: "script",
    missing_input: "请提供选题",
    failure: "生成脚本失败，请重试",
};

const COPY: Endpoint = Endpoint {
    name: "copy",
    missing_input: "请提供内容",
    failure: "生成文案失败，请重试",
};

impl Endpoint {
    /// An undecodable body counts as missing input.
    fn rejected(&self, rejection: JsonRejection) -> ApiError {
        warn!(endpoint = self.name, error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request(self.missing_input)
    }

    /// Only missing input is reported to the client; the rest is logged.
    fn failed(&self, err: StudioError) -> ApiError {
        match err {
            StudioError::MissingField(_) => ApiError::bad_request(self.missing_input),
            other => {
                error!(endpoint = self.name, error = %other, "Generation failed");
                ApiError::internal(self.failure)
            }
        }
    }
}

pub async fn generate_topics(
    State(state): State<AppState>,
    body: Result<Json<TopicsRequest>, JsonRejection>,
) -> Result<Json<TopicsResponse>, ApiError> {
    let Json(request) = body.map_err(|r| TOPICS.rejected(r))?;
    let response = state
        .studio
        .generate_topics(&request)
        .await
        .map_err(|e| TOPICS.failed(e))?;
    Ok(Json(response))
}

pub async fn generate_script(
    State(state): State<AppState>,
    body: Result<Json<ScriptRequest>, JsonRejection>,
) -> Result<Json<ScriptResponse>, ApiError> {
    let Json(request) = body.map_err(|r| SCRIPT.rejected(r))?;
    let response = state
        .studio
        .generate_script(&request)
        .await
        .map_err(|e| SCRIPT.failed(e))?;
    Ok(Json(response))
}

pub async fn generate_copy(
    State(state): State<AppState>,
    body: Result<Json<CopyRequest>, JsonRejection>,
) -> Result<Json<CopyResponse>, ApiError> {
    let Json(request) = body.map_err(|r| COPY.rejected(r))?;
    let response = state
        .studio
        .generate_copy(&request)
        .await
        .map_err(|e| COPY.failed(e))?;
    Ok(Json(response))
}

// ─────────────────────────────────────────────
// Read-only endpoints
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub available: bool,
    pub name: String,
    pub models: Vec<Model>,
}

/// Provider statuses keyed by id, serialized as a JSON object in registry order.
#[derive(Debug)]
pub struct ProviderStatusMap(Vec<(String, ProviderStatus)>);

impl Serialize for ProviderStatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, status)| (id, status)))
    }
}

/// Every registered provider keyed by id, with its availability and models.
pub async fn provider_status(State(state): State<AppState>) -> Json<ProviderStatusMap> {
    let status = state
        .registry()
        .list_providers()
        .iter()
        .map(|p| {
            let entry = ProviderStatus {
                available: p.is_available(),
                name: p.name.clone(),
                models: p.models.clone(),
            };
            (p.id.clone(), entry)
        })
        .collect();
    Json(ProviderStatusMap(status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub model_id: String,
    pub provider_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub platforms: &'static [&'static str],
    pub styles: &'static [&'static str],
    pub durations: &'static [&'static str],
    pub tag_categories: &'static [TagCategory],
    pub default_selection: Option<Selection>,
}

/// Choices a client can offer, and the model to preselect.
pub async fn options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let default_selection = state
        .registry()
        .default_selection()
        .map(|(model, provider)| Selection {
            model_id: model.to_string(),
            provider_id: provider.to_string(),
        });

    Json(OptionsResponse {
        platforms: PLATFORMS,
        styles: STYLES,
        durations: DURATIONS,
        tag_categories: TAG_CATEGORIES,
        default_selection,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use copyflow_core::config::schema::{ProvidersConfig, StudioConfig};
    use copyflow_providers::{Dispatcher, ProviderRegistry};
    use copyflow_studio::ContentStudio;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(api_base: &str, openai_key: &str, deepseek_key: &str) -> AppState {
        let mut providers = ProvidersConfig::default();
        providers.openai.api_key = openai_key.to_string();
        providers.openai.api_base = Some(api_base.to_string());
        providers.deepseek.api_key = deepseek_key.to_string();
        providers.deepseek.api_base = Some(api_base.to_string());

        let registry = Arc::new(ProviderRegistry::from_config(&providers));
        let dispatcher = Dispatcher::new(registry, Duration::from_secs(5)).unwrap();
        AppState::new(ContentStudio::new(dispatcher, StudioConfig::default()))
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-api",
            "choices": [{ "message": { "content": content }, "finish_reason": "stop" }]
        }))
    }

    async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_topics_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(
                "```json\n{\"topics\":[{\"title\":\"T\",\"description\":\"D\",\"reason\":\"R\"}]}\n```",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let state = state_for(&mock_server.uri(), "", "ds-key");
        let request = TopicsRequest {
            tags: vec!["美食".into()],
            ..Default::default()
        };
        let Json(response) = generate_topics(State(state), Ok(Json(request))).await.unwrap();

        assert_eq!(response.topics.len(), 1);
        assert_eq!(response.topics[0].description, "D");
    }

    #[tokio::test]
    async fn test_script_missing_topic_is_400_without_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let state = state_for(&mock_server.uri(), "sk", "ds-key");
        let err = generate_script(State(state), Ok(Json(ScriptRequest::default())))
            .await
            .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "请提供选题" }));
    }

    #[tokio::test]
    async fn test_copy_missing_credential_is_500() {
        let state = state_for("http://127.0.0.1:1", "", "");
        let request = CopyRequest {
            content: "秋季穿搭".into(),
            ..Default::default()
        };
        let err = generate_copy(State(state), Ok(Json(request))).await.unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "生成文案失败，请重试" }));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_500() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{\"script\": \"just a string\"}"))
            .mount(&mock_server)
            .await;

        let state = state_for(&mock_server.uri(), "", "ds-key");
        let request = ScriptRequest {
            topic: "早餐".into(),
            ..Default::default()
        };
        let err = generate_script(State(state), Ok(Json(request))).await.unwrap_err();

        assert_eq!(err, ApiError::internal("生成脚本失败，请重试"));
    }

    #[tokio::test]
    async fn test_provider_status_with_empty_deepseek_key() {
        let state = state_for("http://127.0.0.1:1", "sk-openai", "");
        let Json(status) = provider_status(State(state)).await;
        let body = serde_json::to_value(&status).unwrap();

        assert_eq!(body["openai"]["available"], true);
        assert_eq!(body["openai"]["name"], "OpenAI");
        assert_eq!(body["deepseek"]["available"], false);
        assert_eq!(body["deepseek"]["models"][0]["id"], "deepseek-chat");
        assert_eq!(body["deepseek"]["models"][0]["maxTokens"], 4096);
        assert!(!body.to_string().contains("sk-openai"));
    }

    #[tokio::test]
    async fn test_provider_status_keeps_registry_order() {
        let state = state_for("http://127.0.0.1:1", "", "");
        let Json(status) = provider_status(State(state)).await;
        let text = serde_json::to_string(&status).unwrap();

        let openai = text.find("\"openai\":").unwrap();
        let deepseek = text.find("\"deepseek\":").unwrap();
        assert!(openai < deepseek, "unexpected order: {text}");
    }

    #[tokio::test]
    async fn test_options() {
        let state = state_for("http://127.0.0.1:1", "sk-openai", "");
        let Json(offered) = options(State(state)).await;
        let body = serde_json::to_value(&offered).unwrap();

        assert_eq!(body["platforms"][0], "抖音");
        assert_eq!(body["durations"].as_array().unwrap().len(), 5);
        assert_eq!(body["tagCategories"][3]["name"], "内容形式");
        assert_eq!(
            body["defaultSelection"],
            json!({ "modelId": "gpt-4-turbo-preview", "providerId": "openai" })
        );
    }

    #[tokio::test]
    async fn test_options_without_credentials() {
        let state = state_for("http://127.0.0.1:1", "", "");
        let Json(offered) = options(State(state)).await;
        assert!(offered.default_selection.is_none());
    }
}
