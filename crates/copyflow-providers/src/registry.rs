//! Provider registry — static provider/model specs plus the runtime table.
//!
//! [`PROVIDERS`] describes what each provider offers. [`ProviderRegistry`]
//! binds those specs to the credentials from the loaded config, once, at
//! start-up; nothing mutates it afterwards, so it is shared behind an `Arc`.

use std::collections::HashMap;

use serde::Serialize;

use copyflow_core::config::schema::{ProviderConfig, ProvidersConfig};

// ─────────────────────────────────────────────
// Static specs
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name (e.g. `"deepseek"`).
    pub name: &'static str,
    /// Human-readable name. E.g. `"DeepSeek"`.
    pub display_name: &'static str,
    /// Conventional environment variable for the API key.
    pub env_key: &'static str,
    /// Base URL used when the config sets none.
    pub default_api_base: &'static str,
    /// Models offered, in display order.
    pub models: &'static [ModelSpec],
}

/// Static specification of one model.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    pub id: &'static str,
    pub name: &'static str,
    /// Upper bound on output tokens per request.
    pub max_tokens: u32,
    /// USD per 1000 tokens. Informational only.
    pub cost_per_1k_tokens: f64,
}

/// Supported providers, in display order.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        models: &[
            ModelSpec {
                id: "gpt-4-turbo-preview",
                name: "GPT-4 Turbo",
                max_tokens: 4096,
                cost_per_1k_tokens: 0.03,
            },
            ModelSpec {
                id: "gpt-4",
                name: "GPT-4",
                max_tokens: 8192,
                cost_per_1k_tokens: 0.06,
            },
            ModelSpec {
                id: "gpt-3.5-turbo",
                name: "GPT-3.5 Turbo",
                max_tokens: 4096,
                cost_per_1k_tokens: 0.002,
            },
        ],
    },
    ProviderSpec {
        name: "deepseek",
        display_name: "DeepSeek",
        env_key: "DEEPSEEK_API_KEY",
        default_api_base: "https://api.deepseek.com/v1",
        models: &[
            ModelSpec {
                id: "deepseek-chat",
                name: "DeepSeek Chat",
                max_tokens: 4096,
                cost_per_1k_tokens: 0.0014,
            },
            ModelSpec {
                id: "deepseek-coder",
                name: "DeepSeek Coder",
                max_tokens: 4096,
                cost_per_1k_tokens: 0.0014,
            },
        ],
    },
];

/// Provider preferred by [`ProviderRegistry::default_selection`].
const PREFERRED_PROVIDER: &str = "deepseek";

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

// ─────────────────────────────────────────────
// Runtime types
// ─────────────────────────────────────────────

/// A model as exposed to clients. Serialized with camelCase keys.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    /// Id of the owning provider.
    pub provider: String,
    pub max_tokens: u32,
    pub cost_per_1k_tokens: f64,
}

/// A provider bound to its credential and endpoint.
///
/// Never serialized: it holds the API key.
#[derive(Clone)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub models: Vec<Model>,
    api_key: String,
    api_base: Option<String>,
    default_api_base: String,
    extra_headers: HashMap<String, String>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.id)
            .field("available", &self.is_available())
            .field("api_base", &self.api_base())
            .field("models", &self.models.len())
            .finish()
    }
}

impl Provider {
    /// Whether a credential is configured.
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Look up one of this provider's models.
    pub fn model(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == model_id)
    }

    /// Configured base URL, or the provider default.
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(&self.default_api_base)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn extra_headers(&self) -> &HashMap<String, String> {
        &self.extra_headers
    }

    fn from_spec(spec: &ProviderSpec, config: Option<&ProviderConfig>) -> Self {
        let models = spec
            .models
            .iter()
            .map(|m| Model {
                id: m.id.to_string(),
                name: m.name.to_string(),
                provider: spec.name.to_string(),
                max_tokens: m.max_tokens,
                cost_per_1k_tokens: m.cost_per_1k_tokens,
            })
            .collect();

        Provider {
            id: spec.name.to_string(),
            name: spec.display_name.to_string(),
            models,
            api_key: config.map(|c| c.api_key.clone()).unwrap_or_default(),
            api_base: config.and_then(|c| c.api_base.clone()),
            default_api_base: spec.default_api_base.to_string(),
            extra_headers: config
                .and_then(|c| c.extra_headers.clone())
                .unwrap_or_default(),
        }
    }
}

// ─────────────────────────────────────────────
// ProviderRegistry
// ─────────────────────────────────────────────

/// Read-only provider table, built once from the static specs and config.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Bind every spec in [`PROVIDERS`] to its config entry.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let providers = PROVIDERS
            .iter()
            .map(|spec| Provider::from_spec(spec, config.get_by_name(spec.name)))
            .collect();
        Self { providers }
    }

    /// All providers, in registry order.
    pub fn list_providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn get(&self, provider_id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == provider_id)
    }

    /// Whether `provider_id` names a provider with a credential.
    /// Unknown ids are simply unavailable.
    pub fn is_available(&self, provider_id: &str) -> bool {
        self.get(provider_id).is_some_and(Provider::is_available)
    }

    /// Every model of every available provider.
    pub fn available_models(&self) -> Vec<&Model> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .flat_map(|p| p.models.iter())
            .collect()
    }

    /// `(model_id, provider_id)` a client should preselect: the preferred
    /// provider's first model if available, else the first available model.
    pub fn default_selection(&self) -> Option<(&str, &str)> {
        let models = self.available_models();
        let chosen = models
            .iter()
            .copied()
            .find(|m| m.provider == PREFERRED_PROVIDER)
            .or_else(|| models.first().copied())?;
        Some((chosen.id.as_str(), chosen.provider.as_str()))
    }

    /// First provider declaring `model_id`.
    pub fn find_model_owner(&self, model_id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.model(model_id).is_some())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
