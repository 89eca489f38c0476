//! # Magus
//!
//! A conversational research assistant that augments a language model with
//! external lookup tools through an iterative reasoning loop.
//!
//! This library provides:
//! - A bounded think-act-observe loop over a single-shot generation capability
//! - Pluggable lookup tools (web search, Wikipedia, YouTube) behind a registry
//! - Append-only conversation memory with JSON history export
//! - An explicit session registry for multi-session deployments
//!
//! ## Architecture
//!
//! The agent re-renders the full context into every prompt:
//! 1. Receive a question
//! 2. Render instructions, tool catalog, chat history and scratchpad
//! 3. Call the provider, parse the output into a directive
//! 4. Dispatch a tool and record the observation, or return the final answer
//! 5. Repeat until answered or the iteration ceiling is reached
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use magus::agent::{Agent, PromptTemplate};
//! use magus::llm::OpenAiClient;
//! use magus::tools::{ToolRegistry, Wikipedia};
//!
//! let mut tools = ToolRegistry::new();
//! tools.register(Arc::new(Wikipedia::new()))?;
//!
//! let mut agent = Agent::new(
//!     Arc::new(OpenAiClient::new(api_key)),
//!     Arc::new(tools),
//!     Arc::new(PromptTemplate::default()),
//! );
//! let answer = agent.ask("Quem foi o 7º presidente do Brasil?").await;
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod session;
pub mod tools;

pub use config::Config;
