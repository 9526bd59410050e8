//! The content studio — one entry point per generated artifact.
//!
//! Every operation runs the same pipeline: validate the required input,
//! fill unset fields from [`StudioConfig`], build the prompt, dispatch it,
//! and deserialize the answer into its typed shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use copyflow_core::config::schema::{SamplingConfig, StudioConfig};
use copyflow_core::content::{CopyResponse, ScriptResponse, TopicsResponse};
use copyflow_core::utils::non_blank;
use copyflow_providers::{Dispatcher, ProviderRegistry};

use crate::catalog::normalize_tags;
use crate::error::{Artifact, StudioError};
use crate::prompts::{build_copy_prompt, build_script_prompt, build_topic_prompt};

// ─────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────

/// Ask for topic ideas seeded by `tags`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicsRequest {
    pub tags: Vec<String>,
    pub platform: Option<String>,
    pub model_id: Option<String>,
    pub provider_id: Option<String>,
}

/// Ask for a video script about `topic`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptRequest {
    pub topic: String,
    pub platform: Option<String>,
    pub duration: Option<String>,
    pub model_id: Option<String>,
    pub provider_id: Option<String>,
}

/// Ask for copy summarizing `content`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyRequest {
    pub content: String,
    pub platform: Option<String>,
    pub style: Option<String>,
    pub model_id: Option<String>,
    pub provider_id: Option<String>,
}

// ─────────────────────────────────────────────
// ContentStudio
// ─────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ContentStudio {
    dispatcher: Dispatcher,
    config: StudioConfig,
}

impl ContentStudio {
    pub fn new(dispatcher: Dispatcher, config: StudioConfig) -> Self {
        Self { dispatcher, config }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.dispatcher.registry()
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub async fn generate_topics(&self, request: &TopicsRequest) -> Result<TopicsResponse, StudioError> {
        let tags = normalize_tags(&request.tags);
        if tags.is_empty() {
            return Err(StudioError::MissingField("tags"));
        }

        let platform = or_default(request.platform.as_deref(), &self.config.defaults.platform);
        let prompt = build_topic_prompt(&tags, platform);

        info!(tags = tags.len(), platform = %platform, "Generating topics");
        self.run(
            Artifact::Topics,
            &prompt,
            request.model_id.as_deref(),
            request.provider_id.as_deref(),
            &self.config.topics,
        )
        .await
    }

    pub async fn generate_script(&self, request: &ScriptRequest) -> Result<ScriptResponse, StudioError> {
        let topic = non_blank(Some(request.topic.as_str())).ok_or(StudioError::MissingField("topic"))?;

        let defaults = &self.config.defaults;
        let platform = or_default(request.platform.as_deref(), &defaults.platform);
        let duration = or_default(request.duration.as_deref(), &defaults.duration);
        let prompt = build_script_prompt(topic, platform, duration);

        info!(platform = %platform, duration = %duration, "Generating script");
        self.run(
            Artifact::Script,
            &prompt,
            request.model_id.as_deref(),
            request.provider_id.as_deref(),
            &self.config.script,
        )
        .await
    }

    pub async fn generate_copy(&self, request: &CopyRequest) -> Result<CopyResponse, StudioError> {
        let content = non_blank(Some(request.content.as_str())).ok_or(StudioError::MissingField("content"))?;

        let defaults = &self.config.defaults;
        let platform = or_default(request.platform.as_deref(), &defaults.platform);
        let style = or_default(request.style.as_deref(), &defaults.style);
        let prompt = build_copy_prompt(content, platform, style);

        info!(platform = %platform, style = %style, "Generating copy");
        self.run(
            Artifact::Copy,
            &prompt,
            request.model_id.as_deref(),
            request.provider_id.as_deref(),
            &self.config.copy,
        )
        .await
    }

    /// Pick the `(model, provider)` pair for a request.
    ///
    /// - both set: used as given
    /// - only the provider: its first model
    /// - only the model: the provider declaring it
    /// - neither: the configured defaults
    ///
    /// Whatever cannot be inferred falls back to the configured default, and
    /// the dispatcher reports the mismatch.
    pub fn resolve_selection(&self, model_id: Option<&str>, provider_id: Option<&str>) -> (String, String) {
        let defaults = &self.config.defaults;
        let registry = self.registry();

        match (non_blank(model_id), non_blank(provider_id)) {
            (Some(model), Some(provider)) => (model.to_string(), provider.to_string()),
            (None, Some(provider)) => {
                let model = registry
                    .get(provider)
                    .and_then(|p| p.models.first())
                    .map_or(defaults.model.as_str(), |m| m.id.as_str());
                (model.to_string(), provider.to_string())
            }
            (Some(model), None) => {
                let provider = registry
                    .find_model_owner(model)
                    .map_or(defaults.provider.as_str(), |p| p.id.as_str());
                (model.to_string(), provider.to_string())
            }
            (None, None) => (defaults.model.clone(), defaults.provider.clone()),
        }
    }

    async fn run<T: DeserializeOwned>(
        &self,
        artifact: Artifact,
        prompt: &str,
        model_id: Option<&str>,
        provider_id: Option<&str>,
        sampling: &SamplingConfig,
    ) -> Result<T, StudioError> {
        let (model, provider) = self.resolve_selection(model_id, provider_id);
        debug!(%artifact, model = %model, provider = %provider, "Resolved model selection");

        let value = self
            .dispatcher
            .generate(prompt, &model, &provider, sampling.temperature, sampling.max_tokens)
            .await?;

        serde_json::from_value(value).map_err(|source| StudioError::SchemaMismatch { artifact, source })
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    non_blank(value).unwrap_or(default)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
