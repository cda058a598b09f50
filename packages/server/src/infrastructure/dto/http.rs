//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// A chat message as exposed over HTTP and WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub r#type: String,
    pub room_id: String,
    /// RFC 3339 (UTC, milliseconds)
    pub timestamp: String,
}

/// `POST /chat/message` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: MessageDto,
    pub delivered: usize,
}

/// `GET /chat/history` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<MessageDto>,
    pub room_id: String,
    pub count: usize,
}

/// `GET /chat/online` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    pub count: usize,
    pub users: Vec<String>,
}

/// `GET /chat/stats` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStatsResponse {
    pub count: usize,
    pub rooms: Vec<String>,
    pub users: Vec<String>,
}

/// A book row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub uploaded_by: String,
    pub file_url: String,
    pub first_page_url: Option<String>,
}

/// `POST /book/upload` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadBookResponse {
    pub message: String,
    pub book: BookDto,
}
