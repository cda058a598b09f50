//! Chat HTTP endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    domain::{MessageContent, MessageType, RoomId, Username},
    infrastructure::dto::http::{
        ChatHistoryResponse, ChatStatsResponse, MessageDto, OnlineUsersResponse,
        SendMessageRequest, SendMessageResponse,
    },
    ui::{
        auth::AuthUser,
        error::{ApiError, ApiResult},
        state::AppState,
    },
    usecase::{SendMessageInput, normalize_limit},
};

/// Publish a message to a room
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<SendMessageResponse>> {
    let Json(request) = payload?;

    // String -> Domain Model
    let content = MessageContent::new(request.content)?;
    let room_id = RoomId::new(request.room_id)?;
    let username = match request.username.filter(|name| !name.trim().is_empty()) {
        Some(name) => Some(Username::new(name)?),
        None => None,
    };
    let message_type = match request.r#type.filter(|kind| !kind.trim().is_empty()) {
        Some(kind) => Some(kind.trim().parse::<MessageType>()?),
        None => None,
    };

    let (message, report) = state
        .send_message_usecase
        .execute(SendMessageInput {
            user_id: auth.user_id,
            username,
            content,
            room_id,
            message_type,
        })
        .await?;

    Ok(Json(SendMessageResponse {
        message: (&message).into(),
        delivered: report.delivered,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub room_id: Option<String>,
    pub limit: Option<String>,
}

/// Message history of a room, oldest first
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let room_id = RoomId::new(query.room_id.unwrap_or_default())?;
    let limit = normalize_limit(query.limit.as_deref());

    let messages = state
        .get_chat_history_usecase
        .execute(&room_id, limit)
        .await?;

    // Domain Model から DTO への変換
    let messages: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();
    Ok(Json(ChatHistoryResponse {
        count: messages.len(),
        messages,
        room_id: room_id.into_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct OnlineQuery {
    pub room_id: Option<String>,
}

/// Users currently connected, optionally limited to one room
pub async fn online_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OnlineQuery>,
) -> Result<Json<OnlineUsersResponse>, ApiError> {
    let room_id = match query.room_id.filter(|r| !r.trim().is_empty()) {
        Some(raw) => Some(RoomId::new(raw)?),
        None => None,
    };

    let users: Vec<String> = state
        .get_online_users_usecase
        .execute(room_id.as_ref())
        .await
        .into_iter()
        .map(Username::into_string)
        .collect();

    Ok(Json(OnlineUsersResponse {
        count: users.len(),
        users,
    }))
}

/// Snapshot of connection counts and active rooms
pub async fn chat_stats(State(state): State<Arc<AppState>>) -> Json<ChatStatsResponse> {
    Json(state.get_chat_stats_usecase.execute().await.into())
}
