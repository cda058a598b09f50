//! Conversion logic from domain entities to DTOs.

use lectern_shared::time::to_rfc3339_millis;

use crate::{
    domain::{Book, Delivery, Message},
    infrastructure::{
        dto::{http as http_dto, websocket as ws_dto},
        hub::ChatStats,
    },
};

impl From<&Message> for http_dto::MessageDto {
    fn from(model: &Message) -> Self {
        Self {
            id: model.id.to_string(),
            user_id: model.user_id.as_str().to_string(),
            username: model.username.as_str().to_string(),
            content: model.content.as_str().to_string(),
            r#type: model.message_type.as_str().to_string(),
            room_id: model.room_id.as_str().to_string(),
            timestamp: to_rfc3339_millis(&model.timestamp),
        }
    }
}

impl From<&Delivery> for ws_dto::ServerFrame {
    fn from(delivery: &Delivery) -> Self {
        ws_dto::ServerFrame::ChatMessage(ws_dto::ChatMessagePayload {
            message: (&delivery.message).into(),
            online_users: delivery.online_users,
        })
    }
}

impl From<ChatStats> for http_dto::ChatStatsResponse {
    fn from(stats: ChatStats) -> Self {
        Self {
            count: stats.count,
            rooms: stats.rooms.into_iter().map(|r| r.into_string()).collect(),
            users: stats.users.into_iter().map(|u| u.into_string()).collect(),
        }
    }
}

impl From<Book> for http_dto::BookDto {
    fn from(model: Book) -> Self {
        Self {
            id: model.id.value(),
            title: model.title,
            author: model.author,
            description: model.description,
            uploaded_by: model.uploaded_by.into_string(),
            file_url: model.file_url,
            first_page_url: model.first_page_url,
        }
    }
}
