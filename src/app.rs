use crate::adapters::{ExaClient, ExaClientConfig, LocalStorage};
use crate::core::engine::PrepEngine;
use crate::core::pipeline::MeetingPrepPipeline;
use crate::core::{ConfigProvider, SearchProvider};
use crate::server::AppState;
use crate::tools::exa::ToolSettings;
use crate::tools::{ExaSearchToolset, ToolRegistry};
use crate::utils::error::Result;
use std::sync::Arc;

/// 依設定建立搜尋客戶端
pub fn build_provider<C: ConfigProvider>(config: &C) -> Result<Arc<dyn SearchProvider>> {
    let client = ExaClient::new(ExaClientConfig::from_provider(config))?;
    if !client.is_configured() {
        tracing::warn!("⚠️ EXA_API_KEY is not set; meeting prep requests will fail until it is");
    }
    Ok(Arc::new(client))
}

pub fn build_engine<C: ConfigProvider + 'static>(
    config: C,
    provider: Arc<dyn SearchProvider>,
) -> PrepEngine {
    let monitor_enabled = config.monitoring_enabled();
    let storage = LocalStorage::new(config.archive_dir().unwrap_or(".").to_string());
    let pipeline = MeetingPrepPipeline::new(provider, storage, config);
    PrepEngine::new_with_monitoring(Arc::new(pipeline), monitor_enabled)
}

pub fn build_tools<C: ConfigProvider>(config: &C, provider: Arc<dyn SearchProvider>) -> ToolRegistry {
    let settings = ToolSettings {
        num_results: config.num_results(),
        content_chars: config.content_chars(),
    };
    ToolRegistry::new(ExaSearchToolset::tools(provider, settings))
}

/// 組合伺服器所需的共享狀態
pub fn build_state<C: ConfigProvider + 'static>(config: C) -> Result<AppState> {
    let provider = build_provider(&config)?;
    let tools = build_tools(&config, provider.clone());
    let search_configured = provider.is_configured();
    let engine = build_engine(config, provider);
    Ok(AppState::new(engine, tools, search_configured))
}
