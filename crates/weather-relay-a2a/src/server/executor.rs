//! Agent execution seam of the A2A server.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{A2aError, A2aResult};
use crate::types::{Event, Message, Task};

/// Agent business logic entry point.
///
/// Implement this trait to define how an agent processes an incoming
/// message. Responses are written to the [`EventQueue`]; the request handler
/// drains the queue in order once `execute` returns.
#[async_trait]
pub trait AgentExecutor: Send + Sync + 'static {
    /// Process the message carried by `context`
    async fn execute(&self, context: RequestContext, queue: &EventQueue) -> A2aResult<()>;

    /// Cancel the task identified by `context`.
    ///
    /// An executor that cannot abort work must return an error rather than
    /// pretend the cancellation happened.
    async fn cancel(&self, context: RequestContext, queue: &EventQueue) -> A2aResult<()>;
}

/// Everything an executor knows about the request it is serving
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Task the request belongs to
    pub task_id: String,
    /// Conversation context of the task
    pub context_id: String,
    /// Incoming message, absent for cancellation
    pub message: Option<Message>,
    /// Stored task snapshot at the time the request was accepted
    pub current_task: Option<Task>,
}

impl RequestContext {
    /// Context for a newly received message
    pub fn for_message(task: &Task, message: Message) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            message: Some(message),
            current_task: Some(task.clone()),
        }
    }

    /// Context for an operation on an existing task
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            message: None,
            current_task: Some(task.clone()),
        }
    }

    /// Text parts of the incoming message joined with newlines
    pub fn user_input(&self) -> String {
        self.message
            .as_ref()
            .map(|m| m.joined_text("\n"))
            .unwrap_or_default()
    }
}

/// Ordered, write-only queue of events produced by an executor
#[derive(Debug)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<Event>,
}

/// Reading half of an [`EventQueue`]
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventQueue {
    /// Create a connected queue and receiver
    pub fn new() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, EventReceiver { rx })
    }

    /// Append an event
    pub fn enqueue(&self, event: impl Into<Event>) -> A2aResult<()> {
        self.tx
            .send(event.into())
            .map_err(|_| A2aError::internal_error("event queue closed"))
    }

    /// Close the queue; the receiver drains what was enqueued and stops
    pub fn close(self) {}
}

impl EventReceiver {
    /// Receive every event until the queue is dropped
    pub async fn drain(mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}
