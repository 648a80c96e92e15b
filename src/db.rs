use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;

/// Open the connection pool described by `config`.
///
/// Foreign keys are enforced on every connection so that skill rows cascade
/// with their owning user. An in-memory database lives only as long as its
/// connection, so those pools are pinned to one connection that never expires.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse database url {}", config.database_url))?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
    } else {
        options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
    }
    .context("connect to database")?;

    tracing::debug!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}
