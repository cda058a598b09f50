//! WebSocket frame DTOs.
//!
//! Every frame is an envelope `{ "type": ..., "payload": ... }`.

use serde::{Deserialize, Serialize};

use super::http::MessageDto;

/// Frames pushed from the server to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerFrame {
    ChatMessage(ChatMessagePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub message: MessageDto,
    /// Online users in the room when the message was broadcast
    pub online_users: usize,
}

/// Body of an inbound chat frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: String,
}

/// Frames sent from a client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientFrame {
    Message(ContentPayload),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InboundFrame {
    Enveloped(ClientFrame),
    Bare(ContentPayload),
}

/// Extracts the chat content from an inbound text frame.
///
/// Accepts an enveloped `message` frame, a bare `{"content": ...}` object, or plain
/// (non-JSON) text. Returns `None` for JSON that matches none of these.
pub fn decode_inbound(text: &str) -> Option<String> {
    match serde_json::from_str::<InboundFrame>(text) {
        Ok(InboundFrame::Enveloped(ClientFrame::Message(payload)))
        | Ok(InboundFrame::Bare(payload)) => Some(payload.content),
        Err(_) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Object(_)) => None,
            _ => Some(text.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_enveloped_message() {
        // テスト項目: type/payload 形式のフレームから本文を取り出す
        // given (前提条件):
        let text = r#"{"type":"message","payload":{"content":"hello"}}"#;

        // when (操作):
        let content = decode_inbound(text);

        // then (期待する結果):
        assert_eq!(content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_decode_bare_content_and_plain_text() {
        // テスト項目: {content} 形式とプレーンテキストも受け付ける
        // given (前提条件):
        let bare = r#"{"content":"hi there"}"#;
        let plain = "just text";

        // when (操作):
        let from_bare = decode_inbound(bare);
        let from_plain = decode_inbound(plain);

        // then (期待する結果):
        assert_eq!(from_bare.as_deref(), Some("hi there"));
        assert_eq!(from_plain.as_deref(), Some("just text"));
    }

    #[test]
    fn test_decode_unknown_object_is_ignored() {
        // テスト項目: 本文を持たない JSON オブジェクトは無視される
        // given (前提条件):
        let text = r#"{"type":"typing","payload":{}}"#;

        // when (操作):
        let content = decode_inbound(text);

        // then (期待する結果):
        assert_eq!(content, None);
    }

    #[test]
    fn test_server_frame_uses_type_payload_envelope() {
        // テスト項目: サーバーからのフレームは type=chat_message の封筒に包まれる
        // given (前提条件):
        let frame = ServerFrame::ChatMessage(ChatMessagePayload {
            message: MessageDto {
                id: "00000000-0000-0000-0000-000000000000".to_string(),
                user_id: "alice".to_string(),
                username: "alice".to_string(),
                content: "hello".to_string(),
                r#type: "message".to_string(),
                room_id: "lobby".to_string(),
                timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            },
            online_users: 2,
        });

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "chat_message");
        assert_eq!(json["payload"]["online_users"], 2);
        assert_eq!(json["payload"]["message"]["room_id"], "lobby");
    }
}
