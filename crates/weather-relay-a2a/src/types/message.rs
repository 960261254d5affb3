//! Message types for the A2A protocol.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::Part;
use super::event::MessageKind;
use crate::error::{A2aError, A2aResult};

/// A message exchanged between a client and an agent.
///
/// Serialized inside an [`Event`](super::Event) with `"kind": "message"`.
/// Every message gets a fresh identifier at construction so that a server
/// never deduplicates two distinct sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Object discriminator, always `"message"`
    #[serde(default)]
    pub kind: MessageKind,

    /// Unique message identifier
    pub message_id: String,

    /// Role of the message sender
    pub role: Role,

    /// Content parts of the message
    pub parts: Vec<Part>,

    /// Conversation context this message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Task this message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// References to related tasks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_task_ids: Vec<String>,

    /// Additional metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    /// Create a message with the given role and parts and a fresh identifier
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            kind: MessageKind::Message,
            message_id: new_message_id(),
            role,
            parts,
            context_id: None,
            task_id: None,
            reference_task_ids: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create a new agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, vec![Part::text(text)])
    }

    /// Add a part to the message
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Attach the message to a conversation context
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Attach the message to an existing task
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Iterate over the text payloads of this message, in order
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(Part::as_text)
    }

    /// Text parts joined with the given delimiter
    pub fn joined_text(&self, delimiter: &str) -> String {
        self.text_parts().collect::<Vec<_>>().join(delimiter)
    }

    /// Check the invariants that must hold before a message is transmitted
    pub fn validate(&self) -> A2aResult<()> {
        if self.message_id.trim().is_empty() {
            return Err(A2aError::invalid_message("messageId must not be empty"));
        }
        if self.parts.is_empty() {
            return Err(A2aError::invalid_message(
                "message must contain at least one part",
            ));
        }
        Ok(())
    }
}

/// Generate a message identifier (hyphen-less UUID v4)
pub fn new_message_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user (or client agent acting on behalf of a user)
    User,

    /// Message from an agent
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}
