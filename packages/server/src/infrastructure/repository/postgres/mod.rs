//! PostgreSQL Repository 実装
//!
//! 起動時にスキーマを作成します（`CREATE ... IF NOT EXISTS` なので何度実行しても安全）。

mod book;
mod chat;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::RepositoryError;

pub use book::PgBookRepository;
pub use chat::PgChatRepository;

const SCHEMA: &str = include_str!("../../../../migrations/001_schema.sql");

/// 接続プールを作成し、スキーマを適用する
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, RepositoryError> {
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(db_error)?;

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("schema migration failed: {}", e)))?;

    tracing::info!("Connected to database");
    Ok(pool)
}

pub(super) fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}
