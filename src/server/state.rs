use crate::agent::PersonaStore;
use crate::llm::OpenAiProvider;

/// Shared by every handler. `llm` is `None` when no provider credential is configured.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PersonaStore,
    pub llm: Option<OpenAiProvider>,
}

impl AppState {
    pub fn new(store: PersonaStore, llm: Option<OpenAiProvider>) -> Self {
        Self { store, llm }
    }
}
