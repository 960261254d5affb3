//! # Weather Relay A2A - Agent2Agent Protocol Plumbing
//!
//! This crate carries the A2A (Agent2Agent) protocol pieces shared by the
//! weather relay's two programs: the capability provider that serves an
//! agent over HTTP and the consumer that discovers and calls it.
//!
//! ## Features
//!
//! - **Core Types**: Task, Message, Part, Event and AgentCard types
//! - **A2A Client**: Card discovery, JSON-RPC calls, text aggregation
//!   (requires `client` feature)
//! - **A2A Server**: Expose an [`server::AgentExecutor`] over JSON-RPC
//!   (requires `server` feature)
//!
//! ## Protocol Overview
//!
//! 1. **Agent Card**: JSON document at `/.well-known/agent-card.json`
//! 2. **JSON-RPC**: `message/send`, `tasks/get` and `tasks/cancel` posted to
//!    the card's `url`
//! 3. **Events**: a send answers with messages, task snapshots, status or
//!    artifact updates, discriminated by `kind`
//!
//! ## Example: Creating an Agent Card
//!
//! ```rust
//! use weather_relay_a2a::{AgentCard, AgentSkill};
//!
//! let card = AgentCard::new("Weather Agent", "http://localhost:9999/")
//!     .with_description("Provides weather information")
//!     .with_skill(
//!         AgentSkill::new("get_weather", "Get weather")
//!             .with_description("Current weather for a city")
//!     );
//! assert!(card.validate().is_ok());
//! ```
//!
//! ## Example: Working with Tasks
//!
//! ```rust
//! use weather_relay_a2a::{Message, Task, TaskState};
//!
//! let mut task = Task::new("task-001", "ctx-001");
//! task.add_message(Message::user("What is the weather in Paris?"));
//! task.set_state(TaskState::Completed);
//! assert!(task.is_terminal());
//! ```

pub mod error;
pub mod types;

#[cfg(feature = "client")]
pub mod aggregate;
#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

pub use error::{A2aError, A2aResult, ErrorResponse};
pub use types::{
    AgentCapabilities, AgentCard, AgentSkill, Artifact, DataPart, Event, FileContent, FilePart,
    Message, MessageSendParams, Part, Role, Task, TaskArtifactUpdateEvent, TaskIdParams,
    TaskState, TaskStatus, TaskStatusUpdateEvent, TextPart,
};

#[cfg(feature = "client")]
pub use aggregate::aggregate_text;
#[cfg(feature = "client")]
pub use client::{A2aClient, CardResolver, ClientConfig, EventStream};
