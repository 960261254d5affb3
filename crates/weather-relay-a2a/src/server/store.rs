//! Task storage for the A2A server.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::Task;

/// Storage for task execution records, keyed by task id.
///
/// Implementations must tolerate concurrent `save`/`get` from independent
/// requests.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Insert or replace a task
    async fn save(&self, task: Task);

    /// Look up a task by id
    async fn get(&self, task_id: &str) -> Option<Task>;

    /// Number of stored tasks
    async fn len(&self) -> usize;

    /// Whether the store holds no tasks
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory task store. Tasks live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) {
        debug!(task_id = %task.id, state = %task.state(), "Saving task");
        self.tasks.write().await.insert(task.id.clone(), task);
    }

    async fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.read().await.get(task_id).cloned()
    }

    async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryTaskStore::new();
        assert!(store.is_empty().await);

        let mut task = Task::new("t1", "c1");
        store.save(task.clone()).await;

        task.set_state(TaskState::Completed);
        store.save(task).await;

        let fetched = store.get("t1").await.unwrap();
        assert_eq!(fetched.state(), TaskState::Completed);
        assert_eq!(store.len().await, 1);
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_do_not_interfere() {
        let store = Arc::new(InMemoryTaskStore::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.save(Task::new(format!("task-{i}"), "ctx")).await;
                    store.get(&format!("task-{i}")).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(store.len().await, 32);
    }
}
