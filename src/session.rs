//! Explicit session registry.
//!
//! Each session owns an independent agent (and with it, its conversation
//! memory). The registry shares only the immutable pieces: the generation
//! provider, the tool registry and the prompt template. No ambient state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::{Agent, PromptTemplate, DEFAULT_MAX_ITERATIONS};
use crate::llm::Generator;
use crate::tools::ToolRegistry;

/// Maps session identifiers to owned agents, constructing on first use.
pub struct SessionRegistry {
    llm: Arc<dyn Generator>,
    tools: Arc<ToolRegistry>,
    prompt: Arc<PromptTemplate>,
    max_iterations: usize,
    sessions: HashMap<String, Agent>,
}

impl SessionRegistry {
    pub fn new(
        llm: Arc<dyn Generator>,
        tools: Arc<ToolRegistry>,
        prompt: Arc<PromptTemplate>,
    ) -> Self {
        Self {
            llm,
            tools,
            prompt,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sessions: HashMap::new(),
        }
    }

    /// Iteration ceiling applied to agents created from here on.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Fetch the agent bound to a session, creating it on first use.
    pub fn session(&mut self, id: &str) -> &mut Agent {
        let llm = &self.llm;
        let tools = &self.tools;
        let prompt = &self.prompt;
        let max_iterations = self.max_iterations;
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(session = id, "creating agent for new session");
            Agent::new(llm.clone(), tools.clone(), prompt.clone())
                .with_max_iterations(max_iterations)
        })
    }

    /// Drop a session and its conversation.
    pub fn remove(&mut self, id: &str) -> Option<Agent> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok("Final Answer: echoed".to_string())
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            Arc::new(EchoGenerator),
            Arc::new(ToolRegistry::new()),
            Arc::new(PromptTemplate::default()),
        )
    }

    #[tokio::test]
    async fn sessions_are_created_on_first_use_and_reused() {
        let mut sessions = registry();
        assert!(sessions.is_empty());

        sessions.session("alpha").ask("hi").await;
        sessions.session("alpha").ask("again").await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.session("alpha").chat_history().len(), 4);
    }

    #[tokio::test]
    async fn sessions_do_not_share_conversation_memory() {
        let mut sessions = registry();
        sessions.session("alpha").ask("hi").await;

        assert_eq!(sessions.session("alpha").chat_history().len(), 2);
        assert_eq!(sessions.session("beta").chat_history().len(), 0);
        assert_eq!(sessions.len(), 2);
    }

    #[tokio::test]
    async fn removed_sessions_start_fresh() {
        let mut sessions = registry();
        sessions.session("alpha").ask("hi").await;
        sessions.remove("alpha").expect("session existed");
        assert!(sessions.session("alpha").chat_history().is_empty());
    }
}
