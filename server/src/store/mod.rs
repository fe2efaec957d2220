//! Storage access for todo rows.
//!
//! # Design
//! Handlers only see `dyn TodoStore`, injected through the router state, so
//! the connection pool is an explicit dependency rather than a global. Every
//! method is a single storage round-trip; sequencing (write then read back)
//! is the caller's job and is not transactional.

mod memory;
mod mysql;

pub use memory::MemoryTodoStore;
pub use mysql::MySqlTodoStore;
pub(crate) use mysql::connect_options as mysql_connect_options;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Todo, TodoChanges, TodoId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage assigned an id outside the supported range: {0}")]
    IdOutOfRange(u64),
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All rows, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// Insert an uncompleted row and return the id storage assigned to it.
    async fn insert(&self, text: &str) -> Result<TodoId, StoreError>;

    /// Write `changes` to the row. Returns `false` if no row has `id`.
    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError>;

    /// Hard-delete the row. Returns `false` if no row has `id`.
    async fn delete(&self, id: TodoId) -> Result<bool, StoreError>;
}
