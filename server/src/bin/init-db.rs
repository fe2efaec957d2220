use anyhow::Context;
use todo_server::config::Config;
use todo_server::schema;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    schema::bootstrap(&config.database)
        .await
        .context("database initialization failed")?;
    tracing::info!("database initialization completed successfully");
    Ok(())
}
