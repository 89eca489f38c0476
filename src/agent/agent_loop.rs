//! The reasoning loop.
//!
//! The model has no memory of the loop; the agent reconstructs context by
//! re-rendering history and the scratchpad into every prompt, then dispatches
//! on the parsed directive. All failure modes below `ask` resolve to a string
//! result so the caller never sees an unhandled fault.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map};
use tokio::sync::mpsc::UnboundedSender;

use crate::llm::Generator;
use crate::memory::{export_history, ConversationMemory, Turn};
use crate::tools::ToolRegistry;

use super::parser::{extract_thought, parse_directive, Directive};
use super::prompt::PromptTemplate;

/// Default think-act-observe ceiling per `ask` call.
pub const DEFAULT_MAX_ITERATIONS: usize = 6;

const FALLBACK_ANSWER: &str =
    "I was unable to reach a final answer within the allowed number of reasoning steps.";

/// How an `ask` call terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The model produced a `Final Answer:`.
    Answered,
    /// The iteration ceiling was reached; the text is best-effort.
    Exhausted,
    /// The generation provider failed; the text describes the error.
    Failed,
}

/// Structured result of one `ask` call. The text is always non-empty.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub outcome: Outcome,
    pub text: String,
}

/// One loop event, pushed to an optional channel as the loop runs. The final
/// answer is the terminal event; a synchronous caller just drains to the end.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StepEvent {
    Thought { content: String },
    ToolCall { tool: String, input: String },
    Observation { content: String },
    FinalAnswer { content: String },
}

/// The orchestrator: consumes a generation capability, the tool registry and
/// the prompt template; owns the conversation memory for one session.
pub struct Agent {
    llm: Arc<dyn Generator>,
    tools: Arc<ToolRegistry>,
    prompt: Arc<PromptTemplate>,
    memory: ConversationMemory,
    max_iterations: usize,
    steps: Option<UnboundedSender<StepEvent>>,
}

impl Agent {
    pub fn new(
        llm: Arc<dyn Generator>,
        tools: Arc<ToolRegistry>,
        prompt: Arc<PromptTemplate>,
    ) -> Self {
        Self {
            llm,
            tools,
            prompt,
            memory: ConversationMemory::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            steps: None,
        }
    }

    /// Override the iteration ceiling.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Stream step events to a channel while the loop runs.
    pub fn with_step_events(mut self, steps: UnboundedSender<StepEvent>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Ask the agent a question. Always returns a string: the answer, a
    /// best-effort text on iteration exhaustion, or an error description.
    pub async fn ask(&mut self, query: &str) -> String {
        self.ask_with_outcome(query).await.text
    }

    /// Like [`Agent::ask`], but keeps the terminal state visible so callers
    /// can distinguish "answered" from "degraded" without parsing text.
    ///
    /// Exactly one human and one assistant turn are appended per call,
    /// whatever the terminal state.
    pub async fn ask_with_outcome(&mut self, query: &str) -> AskOutcome {
        let result = self.run(query).await;

        let mut metadata = Map::new();
        metadata.insert("outcome".to_string(), json!(result.outcome));
        metadata.insert("provider".to_string(), json!(self.llm.name()));

        self.memory.append(Turn::human(query));
        self.memory
            .append(Turn::assistant(result.text.clone()).with_metadata(metadata));

        result
    }

    /// Reset the conversation. Idempotent; subsequent prompts render an
    /// empty history section.
    pub fn clear_chat_history(&mut self) {
        self.memory.clear();
    }

    /// Read-only view of the conversation so far.
    pub fn chat_history(&self) -> &[Turn] {
        self.memory.turns()
    }

    /// Serialize the conversation as pretty-printed JSON.
    pub fn export_chat_history(&self) -> Result<String, serde_json::Error> {
        export_history(&self.memory)
    }

    async fn run(&self, query: &str) -> AskOutcome {
        let mut scratchpad = String::new();
        let mut last_observation: Option<String> = None;
        let mut last_thought: Option<String> = None;

        for iteration in 1..=self.max_iterations {
            let prompt = self.prompt.render(&self.tools, &self.memory, query, &scratchpad);

            let output = match self.llm.generate(&prompt).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::error!(provider = self.llm.name(), error = %err, "generation failed");
                    return AskOutcome {
                        outcome: Outcome::Failed,
                        text: format!("An error occurred: {}", err),
                    };
                }
            };

            if let Some(thought) = extract_thought(&output) {
                self.emit(StepEvent::Thought {
                    content: thought.clone(),
                });
                last_thought = Some(thought);
            }

            match parse_directive(&output) {
                Directive::FinalAnswer(answer) => {
                    tracing::debug!(iteration, "final answer produced");
                    self.emit(StepEvent::FinalAnswer {
                        content: answer.clone(),
                    });
                    return AskOutcome {
                        outcome: Outcome::Answered,
                        text: answer,
                    };
                }
                Directive::Action { tool, input } => {
                    let observation = self.dispatch(&tool, &input).await;
                    tracing::debug!(iteration, tool = %tool, "tool dispatched");

                    self.emit(StepEvent::Observation {
                        content: observation.clone(),
                    });
                    scratchpad.push_str(output.trim());
                    scratchpad.push_str(&format!("\nObservation: {}\n", observation));
                    last_observation = Some(observation);
                }
                Directive::Malformed => {
                    tracing::debug!(iteration, "output did not match the expected format");
                    scratchpad.push_str(output.trim());
                    scratchpad.push_str(
                        "\nObservation: Invalid format. Your last output did not match the \
                         expected format. Either call a tool using the `Action:` and \
                         `Action Input:` lines, or finish with `Final Answer:`.\n",
                    );
                }
            }
        }

        tracing::warn!(max_iterations = self.max_iterations, "iteration budget exhausted");
        let text = last_observation
            .or(last_thought)
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string());
        AskOutcome {
            outcome: Outcome::Exhausted,
            text,
        }
    }

    /// Look the named tool up and invoke it. Both lookup failures and tool
    /// failures come back as observation text; the model adapts next thought.
    async fn dispatch(&self, tool: &str, input: &str) -> String {
        match self.tools.get(tool) {
            Ok(found) => {
                self.emit(StepEvent::ToolCall {
                    tool: tool.to_string(),
                    input: input.to_string(),
                });
                match found.invoke(input).await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::warn!(tool = %tool, error = %err, "tool invocation failed");
                        format!("The tool failed: {}", err)
                    }
                }
            }
            Err(_) => format!(
                "`{}` is not a valid tool, try one of [{}].",
                tool,
                self.tools.joined_names()
            ),
        }
    }

    fn emit(&self, event: StepEvent) {
        if let Some(steps) = &self.steps {
            // A dropped receiver must not break the loop.
            let _ = steps.send(event);
        }
    }
}
