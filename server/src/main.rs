use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::config::{Config, StorageMode};
use todo_server::{MemoryTodoStore, MySqlTodoStore, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(storage = ?config.storage, "configuration loaded");

    let store: Arc<dyn TodoStore> = match config.storage {
        StorageMode::MySql => {
            let store = MySqlTodoStore::connect_lazy(&config.database);
            // The server still starts if MySQL is down; requests fail with 500
            // until it comes back.
            match store.ping().await {
                Ok(()) => tracing::info!(
                    database = %config.database.name,
                    "successfully connected to MySQL database"
                ),
                Err(error) => tracing::error!(%error, "error connecting to MySQL"),
            }
            Arc::new(store)
        }
        StorageMode::Memory => Arc::new(MemoryTodoStore::new()),
    };

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("server is running on http://{addr}");
    todo_server::run(listener, store).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
