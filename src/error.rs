//! Crate-wide error types.
//!
//! Errors are split by which external collaborator produced them: tools
//! (lookup capabilities) and generation providers. Everything below the
//! `Agent::ask` boundary resolves to a string result; these types exist so
//! the loop can tell recoverable failures from fatal ones.

use thiserror::Error;

/// Errors raised by tools and the tool registry.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with this name is already registered.
    #[error("a tool named `{0}` is already registered")]
    DuplicateTool(String),

    /// No tool with this name is registered.
    #[error("no tool named `{0}` is registered")]
    UnknownTool(String),

    /// The tool itself failed while handling a query. The message becomes
    /// the observation text so the model can adapt on the next thought.
    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    /// Wrap any displayable failure as an execution error.
    pub fn execution(err: impl std::fmt::Display) -> Self {
        Self::Execution(err.to_string())
    }
}

/// Errors raised by a generation provider. Fatal for the current `ask`
/// call only; the agent reports them as an error string and stays usable.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, timeout).
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response parsed but contained no generated text.
    #[error("{provider} response contained no generated text")]
    EmptyResponse { provider: &'static str },
}
