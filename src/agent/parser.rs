//! Parser for model output in the thought/action grammar.
//!
//! Model text is the loop's control-flow dispatch mechanism, so parsing is
//! isolated here as a pure function returning a tagged directive. The grammar
//! matches what the prompt template instructs the model to emit.

/// What the model asked the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Dispatch a tool with the given input.
    Action { tool: String, input: String },
    /// Terminate with this answer.
    FinalAnswer(String),
    /// Output matched neither grammar; recoverable.
    Malformed,
}

const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const THOUGHT: &str = "Thought:";
const OBSERVATION: &str = "Observation:";

/// Parse one model generation into a directive.
///
/// A non-empty `Final Answer:` wins over an action when both are present,
/// matching the terminal role the template gives it.
pub fn parse_directive(output: &str) -> Directive {
    if let Some(answer) = section_after(output, FINAL_ANSWER) {
        if !answer.is_empty() {
            return Directive::FinalAnswer(answer);
        }
    }

    if let Some(tool) = line_value(output, ACTION) {
        if !tool.is_empty() {
            if let Some(input_start) = output.find(ACTION_INPUT) {
                let raw = &output[input_start + ACTION_INPUT.len()..];
                // The model sometimes continues with a hallucinated
                // Observation; the input ends at the first marker line.
                let input = raw
                    .split(OBSERVATION)
                    .next()
                    .unwrap_or(raw)
                    .split(THOUGHT)
                    .next()
                    .unwrap_or(raw)
                    .trim()
                    .trim_matches('"')
                    .to_string();
                return Directive::Action { tool, input };
            }
        }
    }

    Directive::Malformed
}

/// Everything after the model's `Thought:` line, up to the next marker.
/// Used for step events and the best-effort answer on exhaustion.
pub fn extract_thought(output: &str) -> Option<String> {
    let thought = section_after(output, THOUGHT)?;
    let thought = thought
        .split(ACTION)
        .next()
        .unwrap_or(&thought)
        .split(FINAL_ANSWER)
        .next()
        .unwrap_or(&thought)
        .trim()
        .to_string();
    if thought.is_empty() {
        None
    } else {
        Some(thought)
    }
}

fn section_after(output: &str, marker: &str) -> Option<String> {
    output
        .find(marker)
        .map(|idx| output[idx + marker.len()..].trim().to_string())
}

fn line_value(output: &str, marker: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix(marker)
            .map(|rest| rest.trim().trim_matches('"').to_string())
    })
}
