//! PostgreSQL Chat Repository 実装

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::{
    ChatRepository, Message, MessageContent, MessageId, MessageType, RepositoryError, RoomId,
    UserId, Username,
};

type MessageRow = (Uuid, String, String, String, String, String, DateTime<Utc>);

pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn create_message(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, room_id, user_id, username, content, type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.room_id.as_str())
        .bind(message.user_id.as_str())
        .bind(message.username.as_str())
        .bind(message.content.as_str())
        .bind(message.message_type.as_str())
        .bind(message.timestamp)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn messages_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, room_id, user_id, username, content, type, created_at
            FROM (
                SELECT id, room_id, user_id, username, content, type, created_at
                FROM chat_messages
                WHERE room_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) latest
            ORDER BY created_at ASC
            "#,
        )
        .bind(room_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(message_from_row).collect()
    }
}

fn message_from_row(row: MessageRow) -> Result<Message, RepositoryError> {
    let (id, room_id, user_id, username, content, kind, created_at) = row;
    let corrupt = |e: crate::domain::ValueObjectError| {
        RepositoryError::CorruptRow(format!("chat_messages {}: {}", id, e))
    };

    Ok(Message {
        id: MessageId::from_uuid(id),
        user_id: UserId::new(user_id).map_err(corrupt)?,
        username: Username::new(username).map_err(corrupt)?,
        content: MessageContent::new(content).map_err(corrupt)?,
        message_type: kind.parse::<MessageType>().map_err(corrupt)?,
        room_id: RoomId::new(room_id).map_err(corrupt)?,
        timestamp: created_at,
    })
}
