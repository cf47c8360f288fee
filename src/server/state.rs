//! Application state shared across handlers.

use crate::core::engine::PrepEngine;
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Runs the meeting prep pipeline.
    pub engine: PrepEngine,
    /// Search toolset exposed under `/tools`.
    pub tools: Arc<ToolRegistry>,
    /// Whether the search provider has credentials.
    pub search_configured: bool,
}

impl AppState {
    pub fn new(engine: PrepEngine, tools: ToolRegistry, search_configured: bool) -> Self {
        Self {
            engine,
            tools: Arc::new(tools),
            search_configured,
        }
    }
}
