//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 表示名・種別の既定値、永続化とルームへのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 正常系：表示名を省略した場合は `User_{id}` になる
//! - 異常系：永続化に失敗した場合は配信されない

use std::sync::Arc;

use lectern_shared::time::Clock;

use crate::{
    domain::{Message, MessageContent, MessageType, RoomId, UserId, Username},
    infrastructure::{BroadcastReport, ChatHub},
};

use super::error::SendMessageError;

/// 送信するメッセージの入力
#[derive(Debug, Clone)]
pub struct SendMessageInput {
    pub user_id: UserId,
    /// 省略時は `User_{user_id}`
    pub username: Option<Username>,
    pub content: MessageContent,
    pub room_id: RoomId,
    /// 省略時は `message`
    pub message_type: Option<MessageType>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Arc<ChatHub>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(hub: Arc<ChatHub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// メッセージ送信を実行
    ///
    /// 新しい ID と現在時刻を付与し、永続化してからルームへ配信します。
    /// 配信はリクエストの処理中に行うため、同じ送信経路からのメッセージは
    /// 呼び出し順にルームへ届きます。
    pub async fn execute(
        &self,
        input: SendMessageInput,
    ) -> Result<(Message, BroadcastReport), SendMessageError> {
        let username = input
            .username
            .unwrap_or_else(|| Username::fallback_for(&input.user_id));
        let message = Message::new(
            input.user_id,
            username,
            input.content,
            input.message_type.unwrap_or(MessageType::Message),
            input.room_id,
            self.clock.now(),
        );

        let report = self
            .hub
            .broadcast_message(message.clone())
            .await?;

        tracing::debug!(
            "Message {} from '{}' delivered to {} connections in room '{}'",
            message.id,
            message.user_id,
            report.delivered,
            message.room_id
        );

        Ok((message, report))
    }
}
