//! Shared application state handed to every request.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::bridge::SessionSetup;
use crate::core::tools::ToolRegistry;
use crate::prompts::Prompts;

/// Built once in `main` and shared behind an `Arc`.
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub tools: Arc<ToolRegistry>,
    /// Handshake sent on every new realtime connection
    pub setup: SessionSetup,
}

impl AppState {
    pub fn new(config: ServerConfig, prompts: &Prompts, tools: ToolRegistry) -> Arc<Self> {
        let setup = SessionSetup::new(
            &config,
            prompts.system.clone(),
            prompts.intro_speech.clone(),
            tools.descriptions(),
        );

        Arc::new(Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
            setup,
        })
    }
}
