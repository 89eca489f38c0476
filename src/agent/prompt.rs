//! Prompt rendering for the reasoning loop.
//!
//! The template is the other half of the parser's contract: the structural
//! markers (`Question:`, `Thought:`, `Action:`, `Action Input:`,
//! `Observation:`, `Final Answer:`) instruct the model to produce output the
//! parser in [`super::parser`] can dispatch on. Custom templates are allowed
//! but must keep the markers and placeholders intact.

use thiserror::Error;

use crate::memory::ConversationMemory;
use crate::tools::ToolRegistry;

/// Placeholders every template must contain.
pub const REQUIRED_PLACEHOLDERS: [&str; 5] = [
    "{tools}",
    "{tool_names}",
    "{history}",
    "{input}",
    "{agent_scratchpad}",
];

/// Markers the parser depends on. A template missing one of these would
/// leave the model with no instruction to emit it.
pub const REQUIRED_MARKERS: [&str; 6] = [
    "Question:",
    "Thought:",
    "Action:",
    "Action Input:",
    "Observation:",
    "Final Answer:",
];

const DEFAULT_TEMPLATE: &str = r#"You are a knowledgeable and approachable research assistant designed to help
users find articles, insights, and knowledge related to their questions.
You have access to the following tools to assist in your research:
{tools}

To use a tool, respond exactly in this format:

Question: Identify and restate the user's query.
Thought: Analyze the question and decide whether to use a tool.
Action: Choose a single tool from [{tool_names}] if necessary to gather information.
Action Input: Provide the appropriate input for the selected tool.
Observation: Review the tool's output and reflect on its relevance.

If you already have the answer to the user's question, provide it with the following format:

Thought: I now know what to answer
Final Answer: Deliver a concise, accurate, and helpful response.

IMPORTANT!
FOLLOW the exact format and structure of the template.
When possible, try to always return a helpful related URL (Web, YouTube or Wikipedia) with extra information.

# Important Context:

## Chat History:
{history}

## Latest Question:
{input}

## Your Notes:
{agent_scratchpad}
"#;

/// A substitute template failed validation.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template is missing required placeholder {0}")]
    MissingPlaceholder(&'static str),

    #[error("template is missing required marker `{0}`")]
    MissingMarker(&'static str),
}

/// Deterministic prompt renderer. Immutable after construction; safe to
/// share read-only across sessions.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Use a caller-supplied template. Fails if a required placeholder or
    /// structural marker is absent.
    pub fn custom(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        for placeholder in REQUIRED_PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(TemplateError::MissingPlaceholder(placeholder));
            }
        }
        for marker in REQUIRED_MARKERS {
            if !template.contains(marker) {
                return Err(TemplateError::MissingMarker(marker));
            }
        }
        Ok(Self { template })
    }

    /// Render the full prompt. Pure function of its inputs.
    pub fn render(
        &self,
        tools: &ToolRegistry,
        memory: &ConversationMemory,
        input: &str,
        scratchpad: &str,
    ) -> String {
        let catalog = tools
            .list()
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n");

        let history = memory
            .turns()
            .iter()
            .map(|turn| format!("{}: {}", capitalize(turn.role.as_str()), turn.content))
            .collect::<Vec<_>>()
            .join("\n");

        self.template
            .replace("{tools}", &catalog)
            .replace("{tool_names}", &tools.joined_names())
            .replace("{history}", &history)
            .replace("{input}", input)
            .replace("{agent_scratchpad}", scratchpad)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Turn;
    use crate::tools::testing::RecordingTool;
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(RecordingTool::replying("Search", "ok")))
            .expect("register Search");
        registry
            .register(Arc::new(RecordingTool::replying("Wikipedia", "ok")))
            .expect("register Wikipedia");
        registry
    }

    #[test]
    fn default_template_contains_all_markers() {
        for marker in REQUIRED_MARKERS {
            assert!(
                DEFAULT_TEMPLATE.contains(marker),
                "default template lost marker {marker}"
            );
        }
    }

    #[test]
    fn render_substitutes_all_placeholders() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("oi"));
        memory.append(Turn::assistant("olá"));

        let prompt = PromptTemplate::default().render(
            &registry(),
            &memory,
            "who was Santos Dumont?",
            "Thought: checking\n",
        );

        assert!(prompt.contains("- Search: "));
        assert!(prompt.contains("[Search, Wikipedia]"));
        assert!(prompt.contains("Human: oi\nAssistant: olá"));
        assert!(prompt.contains("who was Santos Dumont?"));
        assert!(prompt.contains("Thought: checking"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn render_is_deterministic() {
        let memory = ConversationMemory::new();
        let template = PromptTemplate::default();
        let a = template.render(&registry(), &memory, "q", "");
        let b = template.render(&registry(), &memory, "q", "");
        assert_eq!(a, b);
    }

    #[test]
    fn cleared_history_renders_empty_section() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("oi"));
        memory.clear();

        let prompt = PromptTemplate::default().render(&registry(), &memory, "q", "");
        assert!(prompt.contains("## Chat History:\n\n"));
    }

    #[test]
    fn custom_template_requires_placeholders_and_markers() {
        let err = PromptTemplate::custom("no placeholders at all")
            .expect_err("template without placeholders must be rejected");
        assert!(matches!(err, TemplateError::MissingPlaceholder("{tools}")));

        let missing_marker = "{tools} {tool_names} {history} {input} {agent_scratchpad}\n\
             Question: Thought: Action: Action Input: Observation:";
        let err = PromptTemplate::custom(missing_marker)
            .expect_err("template without Final Answer must be rejected");
        assert!(matches!(err, TemplateError::MissingMarker("Final Answer:")));

        PromptTemplate::custom(DEFAULT_TEMPLATE).expect("default template validates");
    }
}
