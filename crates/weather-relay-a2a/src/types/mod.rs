//! A2A Protocol Core Types
//!
//! This module defines the core data types for the Agent2Agent (A2A) protocol
//! as spoken by the weather relay: capability cards, messages, tasks, the
//! events a server emits, and the JSON-RPC envelopes that carry them.
//!
//! ## Module Structure
//!
//! - [`agent_card`] - Agent capability discovery
//! - [`message`] - Message and role types
//! - [`part`] - Content part types (text, file, data)
//! - [`task`] - Task lifecycle and status types
//! - [`artifact`] - Task output artifacts
//! - [`event`] - Response events
//! - [`request`] - JSON-RPC request/response types

mod agent_card;
mod artifact;
mod event;
mod message;
mod part;
mod request;
mod task;

// Re-export all types for convenience
pub use agent_card::{
    AGENT_CARD_PATH, AgentCapabilities, AgentCard, AgentSkill, LEGACY_AGENT_CARD_PATH,
    PREFERRED_TRANSPORT, PROTOCOL_VERSION,
};
pub use artifact::Artifact;
pub use event::{
    ArtifactUpdateKind, Event, MessageKind, StatusUpdateKind, TaskArtifactUpdateEvent, TaskKind,
    TaskStatusUpdateEvent,
};
pub use message::{Message, Role, new_message_id};
pub use part::{DataPart, FileContent, FilePart, Part, TextPart};
pub use request::{
    JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, MessageSendConfiguration,
    MessageSendParams, RequestId, SendMessageResult, TaskIdParams, methods,
};
pub use task::{Task, TaskState, TaskStatus};
