//! Event types for the A2A protocol.
//!
//! Every object a server can emit in response to a sent message carries a
//! `kind` discriminator. [`Event`] is the closed set of those objects.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Artifact, Message, Task, TaskStatus};

macro_rules! kind_marker {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $wire:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $wire)]
            $variant,
        }
    };
}

kind_marker!(
    /// `"message"` discriminator
    MessageKind, Message, "message"
);
kind_marker!(
    /// `"task"` discriminator
    TaskKind, Task, "task"
);
kind_marker!(
    /// `"status-update"` discriminator
    StatusUpdateKind, StatusUpdate, "status-update"
);
kind_marker!(
    /// `"artifact-update"` discriminator
    ArtifactUpdateKind, ArtifactUpdate, "artifact-update"
);

/// Event for task status updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    #[serde(default)]
    pub kind: StatusUpdateKind,

    /// Task ID
    pub task_id: String,

    /// Context ID
    pub context_id: String,

    /// New status
    pub status: TaskStatus,

    /// Whether this is the last event for the task
    #[serde(default, rename = "final")]
    pub is_final: bool,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TaskStatusUpdateEvent {
    /// Snapshot the current status of a task
    pub fn for_task(task: &Task, is_final: bool) -> Self {
        Self {
            kind: StatusUpdateKind::StatusUpdate,
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            status: task.status.clone(),
            is_final,
            metadata: HashMap::new(),
        }
    }
}

/// Event for artifact updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    #[serde(default)]
    pub kind: ArtifactUpdateKind,

    /// Task ID
    pub task_id: String,

    /// Context ID
    pub context_id: String,

    /// The artifact being added or updated
    pub artifact: Artifact,

    /// Whether this chunk extends a previously sent artifact
    #[serde(default)]
    pub append: bool,

    /// Whether this is the final chunk of the artifact
    #[serde(default)]
    pub last_chunk: bool,
}

/// One item of the response to a sent message.
///
/// Only [`Event::Message`] carries user-visible content in the weather relay.
/// Consumers must match exhaustively so that a new variant cannot be ignored
/// by accident.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    /// A direct reply message
    Message(Message),

    /// A full task snapshot
    Task(Task),

    /// A task status change
    StatusUpdate(TaskStatusUpdateEvent),

    /// A new or extended artifact
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl Event {
    /// Wire value of the `kind` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Message(_) => "message",
            Event::Task(_) => "task",
            Event::StatusUpdate(_) => "status-update",
            Event::ArtifactUpdate(_) => "artifact-update",
        }
    }
}

impl From<Message> for Event {
    fn from(message: Message) -> Self {
        Event::Message(message)
    }
}

impl From<Task> for Event {
    fn from(task: Task) -> Self {
        Event::Task(task)
    }
}

impl From<TaskStatusUpdateEvent> for Event {
    fn from(update: TaskStatusUpdateEvent) -> Self {
        Event::StatusUpdate(update)
    }
}

const EVENT_KINDS: &[&str] = &["message", "task", "status-update", "artifact-update"];

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| de::Error::missing_field("kind"))?
            .to_string();

        match kind.as_str() {
            "message" => serde_json::from_value(value).map(Event::Message),
            "task" => serde_json::from_value(value).map(Event::Task),
            "status-update" => serde_json::from_value(value).map(Event::StatusUpdate),
            "artifact-update" => serde_json::from_value(value).map(Event::ArtifactUpdate),
            other => return Err(de::Error::unknown_variant(other, EVENT_KINDS)),
        }
        .map_err(de::Error::custom)
    }
}
