//! Error types for LLM calls, tool execution and the agent loop.

use thiserror::Error;

/// Errors returned by an [`LlmProvider`](crate::LlmProvider)
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider rejected the request
    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    /// The provider answered with something we could not use
    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },

    /// Transport failure talking to the provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors returned by a [`Tool`](crate::Tool)
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the tool's schema
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

impl ToolError {
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by a [`ToolAgent`](crate::ToolAgent) invocation
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model call failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The model kept requesting tools past the turn limit
    #[error("agent {agent} exceeded {max_turns} turns without a final answer")]
    MaxTurnsExceeded { agent: String, max_turns: usize },
}
