use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportConfig;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-completion backend. `LlmClient` in production, a scripted fake in tests.
    pub llm: Arc<dyn CompletionService>,
    pub config: Config,
    /// Page geometry and preamble settings for the export backends.
    pub export_config: ExportConfig,
}
