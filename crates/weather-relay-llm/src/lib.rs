//! # weather-relay-llm
//!
//! Chat model access for weather-relay agents.
//!
//! - [`LlmProvider`]: one tool-calling chat completion, with an OpenAI
//!   implementation in [`OpenAiProvider`]
//! - [`Tool`] and [`ToolRegistry`]: functions the model may call
//! - [`ToolAgent`]: instructions plus tools, driven until the model answers
//!
//! ```rust
//! use std::sync::Arc;
//! use weather_relay_llm::{ToolAgent, ToolCompletionResponse};
//! use weather_relay_llm::testing::ScriptedProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = Arc::new(ScriptedProvider::new(vec![
//!     ToolCompletionResponse::text("It is sunny."),
//! ]));
//! let agent = ToolAgent::new("Forecaster", "Answer briefly.", provider);
//!
//! assert_eq!(agent.invoke("Weather?").await.unwrap(), "It is sunny.");
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod openai;
pub mod provider;
pub mod secret;
pub mod testing;
pub mod tool;

pub use agent::{DEFAULT_MAX_TURNS, ToolAgent};
pub use error::{AgentError, LlmError, ToolError};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{
    ChatMessage, FinishReason, LlmProvider, Role, ToolCall, ToolCompletionRequest,
    ToolCompletionResponse, ToolDefinition,
};
pub use secret::ApiKey;
pub use tool::{Tool, ToolRegistry, required_str};
