//! Agent module - the tool-augmented reasoning loop.
//!
//! The agent follows a think-act-observe pattern:
//! 1. Render the prompt from the instruction template, tool catalog, chat
//!    history, current question and scratchpad
//! 2. Call the generation provider and parse its output
//! 3. If it names a tool, dispatch it and append the observation to the
//!    scratchpad; if it gives a final answer, return it
//! 4. Repeat until answered or the iteration ceiling is reached

mod agent_loop;
mod parser;
mod prompt;

pub use agent_loop::{Agent, AskOutcome, Outcome, StepEvent, DEFAULT_MAX_ITERATIONS};
pub use parser::{parse_directive, Directive};
pub use prompt::{PromptTemplate, TemplateError, REQUIRED_MARKERS, REQUIRED_PLACEHOLDERS};
