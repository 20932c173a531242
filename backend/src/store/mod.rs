//! Storage behind the reference service.
//!
//! Tasks belong to a list, identified by the name used at login. Within a
//! list, tasks keep insertion order.

use async_trait::async_trait;
use shared::{Task, TaskInput};
use thiserror::Error;

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("stored task is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// Mints a fresh bearer token bound to `list`.
    async fn issue_token(&self, list: &str) -> Result<String, StoreError>;

    async fn list_for_token(&self, token: &str) -> Result<Option<String>, StoreError>;

    async fn tasks(&self, list: &str) -> Result<Vec<Task>, StoreError>;

    async fn task(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError>;

    async fn create(&self, list: &str, input: TaskInput) -> Result<Task, StoreError>;

    async fn update(
        &self,
        list: &str,
        id: &str,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError>;

    async fn toggle(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError>;

    async fn delete(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// An odd number of concurrent toggles must leave the task checked.
    async fn concurrent_toggles_all_apply(store: Arc<dyn TodoStore>) {
        let list = format!("race-{}", new_id());
        let task = store.create(&list, TaskInput::new("Buy milk", 1)).await.unwrap();

        let toggles: Vec<_> = (0..9)
            .map(|_| {
                let store = Arc::clone(&store);
                let list = list.clone();
                let id = task.id.clone();
                tokio::spawn(async move { store.toggle(&list, &id).await })
            })
            .collect();
        for toggle in toggles {
            assert!(toggle.await.unwrap().unwrap().is_some());
        }

        let stored = store.task(&list, &task.id).await.unwrap().unwrap();
        assert!(stored.checked);
        store.delete(&list, &task.id).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn memory_store_keeps_concurrent_toggles() {
        concurrent_toggles_all_apply(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "needs a running redis; set REDIS_URL"]
    async fn redis_store_keeps_concurrent_toggles() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        concurrent_toggles_all_apply(Arc::new(RedisStore::open(&url).unwrap())).await;
    }

    #[tokio::test]
    async fn missing_task_is_not_modified() {
        let store = MemoryStore::new();
        assert!(store.toggle("New List", "missing").await.unwrap().is_none());
        let input = TaskInput::new("Buy milk", 1);
        assert!(store.update("New List", "missing", input).await.unwrap().is_none());
    }
}
