pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{AppConfig, ConfigProvider, TomlConfig};

pub use adapters::{InMemoryRepository, OfflineLlm, OllamaClient};
pub use crate::core::{AgentOrchestrator, ChatWorkflow, MatchEngine, TalentChatbot};
pub use server::{build_router, AppState};
pub use utils::error::{Result, TalentError};

use std::sync::Arc;

use crate::domain::ports::LlmClient;

/// Builds the LLM client the config asks for.
pub fn llm_from_config(config: &impl ConfigProvider) -> Arc<dyn LlmClient> {
    if config.llm_enabled() {
        Arc::new(OllamaClient::new(
            config.ollama_url(),
            config.model(),
            config.llm_timeout(),
        ))
    } else {
        Arc::new(OfflineLlm)
    }
}

/// Loads the dataset and wires every service behind the HTTP API.
pub fn app_state_from_config(config: &impl ConfigProvider) -> Result<AppState> {
    let repository = Arc::new(InMemoryRepository::load(config.dataset_path())?);
    Ok(AppState::new(
        repository,
        llm_from_config(config),
        config.matching_settings().clone(),
    ))
}
