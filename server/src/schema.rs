//! One-shot creation of the database and the `todos` table.

use sqlx::{Connection, Executor, MySqlConnection};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::store::mysql_connect_options;

pub const CREATE_TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INT AUTO_INCREMENT PRIMARY KEY,
    text VARCHAR(500) NOT NULL,
    completed BOOLEAN DEFAULT false,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
)";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("database name {0:?} is not a plain identifier")]
    InvalidDatabaseName(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Database names are spliced into DDL, so only identifier characters pass.
pub fn check_database_name(name: &str) -> Result<(), SchemaError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidDatabaseName(name.to_string()))
    }
}

/// Create the configured database if needed, then the `todos` table in it.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<(), SchemaError> {
    check_database_name(&config.name)?;

    let mut conn = MySqlConnection::connect_with(&mysql_connect_options(config)).await?;
    tracing::info!(host = %config.host, port = config.port, "connected to MySQL");

    conn.execute(format!("CREATE DATABASE IF NOT EXISTS `{}`", config.name).as_str())
        .await?;
    tracing::info!(database = %config.name, "database created or already exists");

    conn.execute(format!("USE `{}`", config.name).as_str()).await?;
    conn.execute(CREATE_TODOS_TABLE).await?;
    tracing::info!("table `todos` created or already exists");

    conn.close().await?;
    Ok(())
}
