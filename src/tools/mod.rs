//! Lookup tools available to the reasoning loop.
//!
//! A tool is a named external query capability: free-text query in, free-text
//! result out. The registry keeps tools in registration order because that
//! order is rendered verbatim into the prompt and must be deterministic.

mod search;
mod wikipedia;
mod youtube;

pub use search::{SearchSettings, WebSearch};
pub use wikipedia::Wikipedia;
pub use youtube::YouTubeSearch;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ToolError;

/// A named external lookup capability.
#[async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Unique tool name. The model refers to the tool by this name in its
    /// `Action:` line.
    fn name(&self) -> &str;

    /// Human-readable description rendered into the prompt so the model can
    /// choose the right tool.
    fn description(&self) -> &str;

    /// Run the tool against a free-text query.
    async fn invoke(&self, query: &str) -> Result<String, ToolError>;
}

/// Ordered collection of tools, looked up by name.
///
/// Immutable after construction; safe to share read-only across sessions.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if a tool with the same name is present.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(ToolError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look a tool up by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// (name, description) pairs in registration order.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.tools
            .iter()
            .map(|t| (t.name(), t.description()))
            .collect()
    }

    /// Tool names comma-joined, in registration order.
    pub fn joined_names(&self) -> String {
        self.tools
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
