use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use super::{StoreError, TodoStore};
use crate::config::DatabaseConfig;
use crate::model::{Todo, TodoChanges, TodoId};

const SELECT_ALL: &str = "SELECT id, text, completed, created_at, updated_at FROM todos \
     ORDER BY created_at DESC, id DESC";
const SELECT_ONE: &str =
    "SELECT id, text, completed, created_at, updated_at FROM todos WHERE id = ?";
const INSERT: &str = "INSERT INTO todos (text, completed) VALUES (?, false)";
// A NULL bind leaves the column as it is.
const UPDATE: &str = "UPDATE todos SET text = COALESCE(?, text), \
     completed = COALESCE(?, completed) WHERE id = ?";
const DELETE: &str = "DELETE FROM todos WHERE id = ?";

/// `TodoStore` over a bounded MySQL connection pool.
///
/// Each query checks a connection out of the pool for the duration of that
/// one statement. When every connection is busy, callers queue until one is
/// returned or the acquire timeout elapses.
#[derive(Debug, Clone)]
pub struct MySqlTodoStore {
    pool: MySqlPool,
}

impl MySqlTodoStore {
    /// Build the pool without opening a connection; the first query connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(connect_options(config).database(&config.name));
        Self { pool }
    }

    /// Check out one connection and hand it straight back.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.pool.acquire().await?;
        Ok(())
    }
}

/// Server-level options shared by the pool and schema bootstrap.
pub(crate) fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
}

#[async_trait]
impl TodoStore for MySqlTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn insert(&self, text: &str) -> Result<TodoId, StoreError> {
        let result = sqlx::query(INSERT).bind(text).execute(&self.pool).await?;
        let id = result.last_insert_id();
        TodoId::try_from(id).map_err(|_| StoreError::IdOutOfRange(id))
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError> {
        // rows_affected counts changed rows only, so an unchanged row would
        // read as missing; check existence separately.
        sqlx::query(UPDATE)
            .bind(changes.text())
            .bind(changes.completed())
            .bind(id)
            .execute(&self.pool)
            .await?;
        let exists: Option<(TodoId,)> = sqlx::query_as("SELECT id FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(exists.is_some())
    }

    async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
