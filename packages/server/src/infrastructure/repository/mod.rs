//! Repository 実装
//!
//! - `inmemory`: テストや DB 無しでの起動に使うインメモリ実装
//! - `postgres`: sqlx による PostgreSQL 実装

pub mod inmemory;
pub mod postgres;

pub use inmemory::{InMemoryBookRepository, InMemoryChatRepository};
pub use postgres::{PgBookRepository, PgChatRepository, connect_pool};
