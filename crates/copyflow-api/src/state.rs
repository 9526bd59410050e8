//! Handler state.

use std::sync::Arc;

use copyflow_providers::ProviderRegistry;
use copyflow_studio::ContentStudio;

/// State shared by every handler. Cloned per request; everything inside is
/// read-only after start-up.
#[derive(Clone, Debug)]
pub struct AppState {
    pub studio: Arc<ContentStudio>,
}

impl AppState {
    pub fn new(studio: ContentStudio) -> Self {
        Self {
            studio: Arc::new(studio),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.studio.registry()
    }
}
