use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, TodoStore};
use crate::model::{Todo, TodoChanges, TodoId};

/// In-process store with the same observable behavior as the `todos` table.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    inner: RwLock<Rows>,
}

#[derive(Debug, Default)]
struct Rows {
    last_id: TodoId,
    todos: BTreeMap<TodoId, Todo>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = self.inner.read().await;
        let mut todos: Vec<Todo> = rows.todos.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.inner.read().await.todos.get(&id).cloned())
    }

    async fn insert(&self, text: &str) -> Result<TodoId, StoreError> {
        let mut rows = self.inner.write().await;
        rows.last_id += 1;
        let id = rows.last_id;
        let now = Utc::now();
        rows.todos.insert(
            id,
            Todo {
                id,
                text: text.to_string(),
                completed: false,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError> {
        let mut rows = self.inner.write().await;
        let Some(todo) = rows.todos.get_mut(&id) else {
            return Ok(false);
        };
        if changes.apply(todo) {
            todo.updated_at = Utc::now().max(todo.created_at);
        }
        Ok(true)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.todos.remove(&id).is_some())
    }
}
