use crate::domain::model::truncate_chars;
use crate::domain::ports::SearchProvider;
use crate::tools::Tool;
use crate::utils::error::{PrepError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const DEFAULT_NUM_RESULTS: usize = 3;
pub const DEFAULT_CONTENT_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct ToolSettings {
    pub num_results: usize,
    pub content_chars: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            content_chars: DEFAULT_CONTENT_CHARS,
        }
    }
}

fn string_arg_schema(field: &str, description: &str) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        field.to_string(),
        json!({ "type": "string", "description": description }),
    );
    json!({
        "type": "object",
        "properties": properties,
        "required": [field]
    })
}

fn tool_error(tool: &str, message: impl Into<String>) -> PrepError {
    PrepError::Tool {
        tool: tool.to_string(),
        message: message.into(),
    }
}

pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    settings: ToolSettings,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: ToolSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search for a webpage based on the query."
    }

    fn args_schema(&self) -> serde_json::Value {
        string_arg_schema("query", "Search query")
    }

    async fn run(&self, input: &str) -> Result<String> {
        let query = input.trim();
        if query.is_empty() {
            return Err(tool_error(self.name(), "query cannot be empty"));
        }
        let response = self.provider.search(query, self.settings.num_results).await?;
        Ok(response.to_string())
    }
}

pub struct FindSimilarTool {
    provider: Arc<dyn SearchProvider>,
    settings: ToolSettings,
}

impl FindSimilarTool {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: ToolSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl Tool for FindSimilarTool {
    fn name(&self) -> &str {
        "find_similar"
    }

    fn description(&self) -> &str {
        "Search for webpages similar to a given URL. The url passed in should be a URL returned from search."
    }

    fn args_schema(&self) -> serde_json::Value {
        string_arg_schema("url", "URL to find similar pages")
    }

    async fn run(&self, input: &str) -> Result<String> {
        let url = input.trim();
        validate_url("url", url).map_err(|e| tool_error(self.name(), e.to_string()))?;
        let response = self
            .provider
            .find_similar(url, self.settings.num_results)
            .await?;
        Ok(response.to_string())
    }
}

pub struct GetContentsTool {
    provider: Arc<dyn SearchProvider>,
    settings: ToolSettings,
}

impl GetContentsTool {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: ToolSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl Tool for GetContentsTool {
    fn name(&self) -> &str {
        "get_contents"
    }

    fn description(&self) -> &str {
        "Get the contents of a webpage. The ids must be passed in as a list, a list of ids returned from search."
    }

    fn args_schema(&self) -> serde_json::Value {
        string_arg_schema("ids", "List of IDs as string")
    }

    async fn run(&self, input: &str) -> Result<String> {
        let ids = parse_id_list(input);
        if ids.is_empty() {
            return Err(tool_error(self.name(), "no ids provided"));
        }
        let response = self.provider.get_contents(&ids).await?;
        Ok(clip_contents(&response.to_string(), self.settings.content_chars))
    }
}

/// 解析 id 清單：JSON 陣列、單引號清單 (`['a', 'b']`) 或逗號分隔字串
pub fn parse_id_list(input: &str) -> Vec<String> {
    let trimmed = input.trim();

    if trimmed.starts_with('[') {
        if let Ok(ids) = serde_json::from_str::<Vec<String>>(trimmed) {
            return ids.into_iter().filter(|id| !id.trim().is_empty()).collect();
        }
        if let Ok(ids) = serde_json::from_str::<Vec<String>>(&trimmed.replace('\'', "\"")) {
            return ids.into_iter().filter(|id| !id.trim().is_empty()).collect();
        }
    }

    trimmed
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|id| id.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// 依 "URL:" 切段，每段截斷為 `max_chars` 個字元後以空行連接
pub fn clip_contents(rendered: &str, max_chars: usize) -> String {
    rendered
        .split("URL:")
        .map(|chunk| truncate_chars(chunk, max_chars))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct ExaSearchToolset;

impl ExaSearchToolset {
    pub fn tools(provider: Arc<dyn SearchProvider>, settings: ToolSettings) -> Vec<Box<dyn Tool>> {
        vec![
            Box::new(SearchTool::new(provider.clone(), settings)),
            Box::new(FindSimilarTool::new(provider.clone(), settings)),
            Box::new(GetContentsTool::new(provider, settings)),
        ]
    }
}
