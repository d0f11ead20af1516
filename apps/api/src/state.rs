use std::sync::Arc;

use crate::assist::AssistantChain;
use crate::config::Config;
use crate::llm_client::LlmError;
use crate::store::MemStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemStore>,
    /// Configured AI providers followed by the local assistant.
    pub assistants: Arc<AssistantChain>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let store = Arc::new(MemStore::new());
        let assistants = Arc::new(AssistantChain::from_config(config, store.clone())?);
        Ok(Self { store, assistants })
    }
}
