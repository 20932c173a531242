//! The list controller: a local mirror of one remote to-do list.
//!
//! State lives behind `RefCell`s so the controller can be shared (`Rc`) with
//! UI callbacks on a single thread. No borrow is held across an `.await`;
//! cache updates after a network call re-locate their entry by id.

use std::cell::RefCell;

use crate::client::TodoApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::{Task, TaskInput};

pub struct ListController<T> {
    api: TodoApi<T>,
    session: RefCell<Option<String>>,
    tasks: RefCell<Vec<Task>>,
}

impl<T: Transport> ListController<T> {
    pub fn new(api: TodoApi<T>) -> Self {
        Self {
            api,
            session: RefCell::new(None),
            tasks: RefCell::new(Vec::new()),
        }
    }

    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::new(TodoApi::new(transport, config.base_url.clone()))
    }

    /// Snapshot of the cached tasks in server order.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn has_session(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Logs in as `name`, then loads the list.
    ///
    /// A failed login leaves no session. A failed list fetch keeps the
    /// session but leaves the cache empty.
    pub async fn initialize(&self, name: &str) -> Result<(), ClientError> {
        logged("initialize", name, self.try_initialize(name).await)
    }

    pub async fn add(&self, text: &str, priority: i64) -> Result<Task, ClientError> {
        logged("add", text, self.try_add(text, priority).await)
    }

    /// Replaces text and priority, then refreshes the entry from the server.
    pub async fn edit(&self, id: &str, text: &str, priority: i64) -> Result<(), ClientError> {
        logged("edit", id, self.try_edit(id, text, priority).await)
    }

    /// Flips completion on the server, then refreshes the entry.
    pub async fn complete(&self, id: &str) -> Result<(), ClientError> {
        logged("complete", id, self.try_complete(id).await)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        logged("delete", id, self.try_delete(id).await)
    }

    async fn try_initialize(&self, name: &str) -> Result<(), ClientError> {
        let token = self.api.login(name).await?;
        *self.session.borrow_mut() = Some(token.clone());
        tracing::info!(list = name, "session established");

        let tasks = self.api.list(&token).await?;
        tracing::info!(count = tasks.len(), "task list loaded");
        *self.tasks.borrow_mut() = tasks;
        Ok(())
    }

    async fn try_add(&self, text: &str, priority: i64) -> Result<Task, ClientError> {
        let token = self.token()?;
        let task = self
            .api
            .create(&token, &TaskInput::new(text, priority))
            .await?;
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }

    async fn try_edit(&self, id: &str, text: &str, priority: i64) -> Result<(), ClientError> {
        self.ensure_cached(id)?;
        let token = self.token()?;
        self.api
            .update(&token, id, &TaskInput::new(text, priority))
            .await?;
        let fresh = self.api.fetch(&token, id).await?;
        self.replace(fresh);
        Ok(())
    }

    async fn try_complete(&self, id: &str) -> Result<(), ClientError> {
        self.ensure_cached(id)?;
        let token = self.token()?;
        self.api.toggle(&token, id).await?;
        let fresh = self.api.fetch(&token, id).await?;
        self.replace(fresh);
        Ok(())
    }

    async fn try_delete(&self, id: &str) -> Result<(), ClientError> {
        self.ensure_cached(id)?;
        let token = self.token()?;
        self.api.remove(&token, id).await?;

        let mut tasks = self.tasks.borrow_mut();
        if let Some(index) = tasks.iter().position(|task| task.id == id) {
            tasks.remove(index);
        }
        Ok(())
    }

    fn token(&self) -> Result<String, ClientError> {
        self.session.borrow().clone().ok_or(ClientError::NoSession)
    }

    fn ensure_cached(&self, id: &str) -> Result<(), ClientError> {
        if self.tasks.borrow().iter().any(|task| task.id == id) {
            Ok(())
        } else {
            Err(ClientError::NotFound(id.to_string()))
        }
    }

    fn replace(&self, fresh: Task) {
        let mut tasks = self.tasks.borrow_mut();
        match tasks.iter_mut().find(|task| task.id == fresh.id) {
            Some(slot) => *slot = fresh,
            None => tracing::warn!(id = %fresh.id, "task left the cache before refresh"),
        }
    }
}

fn logged<V>(
    operation: &'static str,
    subject: &str,
    result: Result<V, ClientError>,
) -> Result<V, ClientError> {
    if let Err(err) = &result {
        tracing::error!(operation, subject, %err, "task operation failed");
    }
    result
}
