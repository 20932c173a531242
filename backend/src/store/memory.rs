use std::collections::HashMap;

use async_trait::async_trait;
use shared::{Task, TaskInput};
use tokio::sync::Mutex;

use super::{new_id, StoreError, TodoStore};

#[derive(Default)]
struct State {
    tokens: HashMap<String, String>,
    lists: HashMap<String, Vec<Task>>,
}

/// Process-local store, used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn issue_token(&self, list: &str) -> Result<String, StoreError> {
        let token = new_id();
        let mut state = self.state.lock().await;
        state.tokens.insert(token.clone(), list.to_string());
        Ok(token)
    }

    async fn list_for_token(&self, token: &str) -> Result<Option<String>, StoreError> {
        Ok(self.state.lock().await.tokens.get(token).cloned())
    }

    async fn tasks(&self, list: &str) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.lists.get(list).cloned().unwrap_or_default())
    }

    async fn task(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .lists
            .get(list)
            .and_then(|tasks| tasks.iter().find(|task| task.id == id))
            .cloned())
    }

    async fn create(&self, list: &str, input: TaskInput) -> Result<Task, StoreError> {
        let task = Task::new(new_id(), input);
        let mut state = self.state.lock().await;
        state
            .lists
            .entry(list.to_string())
            .or_default()
            .push(task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        list: &str,
        id: &str,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(find_mut(&mut state, list, id).map(|task| {
            task.value = input.value;
            task.priority = input.priority;
            task.clone()
        }))
    }

    async fn toggle(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(find_mut(&mut state, list, id).map(|task| {
            task.checked = !task.checked;
            task.clone()
        }))
    }

    async fn delete(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(tasks) = state.lists.get_mut(list) else {
            return Ok(None);
        };
        Ok(tasks
            .iter()
            .position(|task| task.id == id)
            .map(|index| tasks.remove(index)))
    }
}

fn find_mut<'a>(state: &'a mut State, list: &str, id: &str) -> Option<&'a mut Task> {
    state
        .lists
        .get_mut(list)
        .and_then(|tasks| tasks.iter_mut().find(|task| task.id == id))
}
