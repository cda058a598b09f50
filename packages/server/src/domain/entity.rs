//! ドメインエンティティ

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    error::ValueObjectError,
    value_object::{BookId, MessageContent, MessageId, RoomId, UserId, Username},
};

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Message,
    System,
    Join,
    Leave,
    Private,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Message => "message",
            MessageType::System => "system",
            MessageType::Join => "join",
            MessageType::Leave => "leave",
            MessageType::Private => "private",
        }
    }
}

impl FromStr for MessageType {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageType::Message),
            "system" => Ok(MessageType::System),
            "join" => Ok(MessageType::Join),
            "leave" => Ok(MessageType::Leave),
            "private" => Ok(MessageType::Private),
            other => Err(ValueObjectError::UnknownMessageType(other.to_string())),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// チャットメッセージ（不変）
///
/// 送信者（クライアント、またはシステム通知の場合は Hub 自身）が生成し、
/// 永続化されてからルームにブロードキャストされます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub username: Username,
    pub content: MessageContent,
    pub message_type: MessageType,
    pub room_id: RoomId,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// 新しい ID を採番してメッセージを生成
    pub fn new(
        user_id: UserId,
        username: Username,
        content: MessageContent,
        message_type: MessageType,
        room_id: RoomId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            user_id,
            username,
            content,
            message_type,
            room_id,
            timestamp,
        }
    }

    /// 入室・退室のシステム通知を生成
    pub fn presence_notice(
        room_id: RoomId,
        kind: Presence,
        username: &Username,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let text = match kind {
            Presence::Joined => format!("{} joined the chat", username),
            Presence::Left => format!("{} left the chat", username),
        };
        Self::new(
            UserId::system(),
            Username::system(),
            MessageContent::system_text(text),
            kind.message_type(),
            room_id,
            timestamp,
        )
    }
}

/// 入退室の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Joined,
    Left,
}

impl Presence {
    pub fn message_type(&self) -> MessageType {
        match self {
            Presence::Joined => MessageType::Join,
            Presence::Left => MessageType::Leave,
        }
    }
}

/// 書籍
///
/// `first_page_url` は取り込みパイプラインが完了するまで `None`。
/// 読者はサムネイルが無い状態を許容する必要があります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub uploaded_by: UserId,
    pub file_url: String,
    pub first_page_url: Option<String>,
}

/// 書籍作成時の入力（ID 採番前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub uploaded_by: UserId,
    pub file_url: String,
}

impl NewBook {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            uploaded_by: self.uploaded_by,
            file_url: self.file_url,
            first_page_url: None,
        }
    }
}
