use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use shared::{Task, TaskInput};

use super::{new_id, StoreError, TodoStore};

/// Redis layout:
///
/// - `token:{token}` holds the list name
/// - `list:{name}:order` is a Redis list of task ids
/// - `list:{name}:task:{id}` holds the task as JSON
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    async fn connection(&self) -> Result<redis::aio::Connection, StoreError> {
        Ok(self.client.get_async_connection().await?)
    }

    async fn save(
        &self,
        conn: &mut redis::aio::Connection,
        list: &str,
        task: &Task,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(task)?;
        let _: () = conn.set(task_key(list, &task.id), json).await?;
        Ok(())
    }

    async fn load(
        &self,
        conn: &mut redis::aio::Connection,
        list: &str,
        id: &str,
    ) -> Result<Option<Task>, StoreError> {
        let json: Option<String> = conn.get(task_key(list, id)).await?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write of one task under `WATCH`. The `MULTI`/`EXEC` is
    /// aborted if another client wrote the key in between, and then retried.
    async fn modify<F>(
        &self,
        list: &str,
        id: &str,
        change: F,
    ) -> Result<Option<Task>, StoreError>
    where
        F: Fn(&mut Task) + Send,
    {
        let key = task_key(list, id);
        let mut conn = self.connection().await?;
        loop {
            let _: () = redis::cmd("WATCH").arg(&key).query_async(&mut conn).await?;
            let Some(mut task) = self.load(&mut conn, list, id).await? else {
                let _: () = redis::cmd("UNWATCH").query_async(&mut conn).await?;
                return Ok(None);
            };
            change(&mut task);

            let json = serde_json::to_string(&task)?;
            let committed: Option<()> = redis::pipe()
                .atomic()
                .set(&key, json)
                .ignore()
                .query_async(&mut conn)
                .await?;
            if committed.is_some() {
                return Ok(Some(task));
            }
            tracing::debug!(list, id, "task written concurrently; retrying");
        }
    }
}

fn token_key(token: &str) -> String {
    format!("token:{token}")
}

fn order_key(list: &str) -> String {
    format!("list:{list}:order")
}

fn task_key(list: &str, id: &str) -> String {
    format!("list:{list}:task:{id}")
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn issue_token(&self, list: &str) -> Result<String, StoreError> {
        let token = new_id();
        let mut conn = self.connection().await?;
        let _: () = conn.set(token_key(&token), list).await?;
        Ok(token)
    }

    async fn list_for_token(&self, token: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(token_key(token)).await?)
    }

    async fn tasks(&self, list: &str) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.lrange(order_key(list), 0, -1).await?;

        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load(&mut conn, list, &id).await? {
                Some(task) => tasks.push(task),
                None => tracing::warn!(list, %id, "ordered id without a stored task"),
            }
        }
        Ok(tasks)
    }

    async fn task(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        self.load(&mut conn, list, id).await
    }

    async fn create(&self, list: &str, input: TaskInput) -> Result<Task, StoreError> {
        let task = Task::new(new_id(), input);
        let mut conn = self.connection().await?;
        self.save(&mut conn, list, &task).await?;
        let _: () = conn.rpush(order_key(list), &task.id).await?;
        Ok(task)
    }

    async fn update(
        &self,
        list: &str,
        id: &str,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError> {
        self.modify(list, id, |task| {
            task.value = input.value.clone();
            task.priority = input.priority;
        })
        .await
    }

    async fn toggle(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        self.modify(list, id, |task| task.checked = !task.checked).await
    }

    async fn delete(&self, list: &str, id: &str) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let Some(task) = self.load(&mut conn, list, id).await? else {
            return Ok(None);
        };
        let _: () = conn.del(task_key(list, id)).await?;
        let _: () = conn.lrem(order_key(list), 1, id).await?;
        Ok(Some(task))
    }
}
