//! Text-in/text-out wrappers around the search provider.
//!
//! Each tool takes a single string argument and returns a rendered string,
//! so the same toolset can back the HTTP `/tools` surface and the CLI.

pub mod exa;

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub use exa::{ExaSearchToolset, FindSimilarTool, GetContentsTool, SearchTool};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the single input argument.
    fn args_schema(&self) -> serde_json::Value;
    async fn run(&self, input: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub args_schema: serde_json::Value,
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                args_schema: t.args_schema(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}
