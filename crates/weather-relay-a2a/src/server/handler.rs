//! Request handling between the JSON-RPC surface and an [`AgentExecutor`].

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::executor::{AgentExecutor, EventQueue, RequestContext};
use super::store::TaskStore;
use crate::error::{A2aError, A2aResult};
use crate::types::{Event, MessageSendParams, Task, TaskIdParams, TaskState};

/// Drives an executor for each A2A request and keeps the task store current
pub struct DefaultRequestHandler<E: AgentExecutor> {
    executor: Arc<E>,
    store: Arc<dyn TaskStore>,
}

impl<E: AgentExecutor> Clone for DefaultRequestHandler<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: AgentExecutor> DefaultRequestHandler<E> {
    pub fn new(executor: E, store: Arc<dyn TaskStore>) -> Self {
        Self {
            executor: Arc::new(executor),
            store,
        }
    }

    /// The task store backing this handler
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Handle `message/send`.
    ///
    /// Returns the first message the executor produced, or the task snapshot
    /// when it produced none.
    pub async fn on_message_send(&self, params: MessageSendParams) -> A2aResult<Event> {
        let mut message = params.message;
        message
            .validate()
            .map_err(|e| A2aError::invalid_params(e.to_string()))?;

        let mut task = match message.task_id.as_deref() {
            Some(task_id) => {
                let task = self
                    .store
                    .get(task_id)
                    .await
                    .ok_or_else(|| A2aError::task_not_found(task_id))?;
                if task.is_terminal() {
                    return Err(A2aError::invalid_params(format!(
                        "task {} is already {}",
                        task.id,
                        task.state()
                    )));
                }
                task
            }
            None => {
                let context_id = message
                    .context_id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                Task::new(Uuid::new_v4().to_string(), context_id)
            }
        };

        message.task_id = Some(task.id.clone());
        message.context_id = Some(task.context_id.clone());
        task.add_message(message.clone());
        task.set_state(TaskState::Working);
        self.store.save(task.clone()).await;

        debug!(task_id = %task.id, message_id = %message.message_id, "Executing message");

        let context = RequestContext::for_message(&task, message);
        let (queue, receiver) = EventQueue::new();
        let outcome = self.executor.execute(context, &queue).await;
        queue.close();
        let events = receiver.drain().await;

        apply_events(&mut task, &events);

        // A concurrent tasks/cancel may have concluded the task meanwhile
        let concluded = match self.store.get(&task.id).await {
            Some(stored) if stored.is_terminal() => {
                debug!(task_id = %task.id, state = %stored.state(), "Task concluded during execution");
                task.status = stored.status;
                true
            }
            _ => false,
        };

        if let Err(e) = outcome {
            error!(task_id = %task.id, error = %e, "Executor failed");
            if !concluded {
                task.set_state(TaskState::Failed);
            }
            self.store.save(task).await;
            return Err(e);
        }

        if !task.is_terminal() && task.state() != TaskState::InputRequired {
            task.set_state(TaskState::Completed);
        }
        self.store.save(task.clone()).await;

        debug!(task_id = %task.id, state = %task.state(), events = events.len(), "Message processed");

        let reply = events.into_iter().find(|e| matches!(e, Event::Message(_)));
        Ok(reply.unwrap_or(Event::Task(task)))
    }

    /// Handle `tasks/get`
    pub async fn on_get_task(&self, params: TaskIdParams) -> A2aResult<Task> {
        let mut task = self
            .store
            .get(&params.id)
            .await
            .ok_or_else(|| A2aError::task_not_found(&params.id))?;

        if let Some(limit) = params.history_length {
            let skip = task.history.len().saturating_sub(limit);
            task.history.drain(..skip);
        }
        Ok(task)
    }

    /// Handle `tasks/cancel`.
    ///
    /// Executor refusals propagate to the caller and leave the task untouched.
    pub async fn on_cancel_task(&self, params: TaskIdParams) -> A2aResult<Task> {
        let mut task = self
            .store
            .get(&params.id)
            .await
            .ok_or_else(|| A2aError::task_not_found(&params.id))?;

        if task.is_terminal() {
            return Err(A2aError::task_not_cancelable(
                &task.id,
                task.state().to_string(),
            ));
        }

        let (queue, receiver) = EventQueue::new();
        let outcome = self
            .executor
            .cancel(RequestContext::for_task(&task), &queue)
            .await;
        queue.close();

        if let Err(e) = outcome {
            warn!(task_id = %task.id, error = %e, "Cancel refused by executor");
            return Err(e);
        }

        apply_events(&mut task, &receiver.drain().await);
        if !task.is_terminal() {
            task.set_state(TaskState::Canceled);
        }
        self.store.save(task.clone()).await;

        info!(task_id = %task.id, "Task cancelled");
        Ok(task)
    }
}

/// Fold executor output into the stored task record
fn apply_events(task: &mut Task, events: &[Event]) {
    for event in events {
        match event {
            Event::Message(message) => task.add_message(message.clone()),
            Event::Task(snapshot) => {
                task.status = snapshot.status.clone();
                task.artifacts = snapshot.artifacts.clone();
            }
            Event::StatusUpdate(update) => task.status = update.status.clone(),
            Event::ArtifactUpdate(update) => task.add_artifact(update.artifact.clone()),
        }
    }
}
