//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - Mailbox の生成と Hub への登録、重複接続の拒否
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続（既存の参加者に入室通知が届く）
//! - 異常系：同じルームに同じ user_id で接続

use std::sync::Arc;

use crate::{
    domain::{Connection, ConnectionInfo, MailboxReceiver, RoomId, UserId, Username},
    infrastructure::{ChatHub, HubError},
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    hub: Arc<ChatHub>,
    /// 接続ごとの Mailbox の容量
    mailbox_capacity: usize,
}

impl ConnectParticipantUseCase {
    pub fn new(hub: Arc<ChatHub>, mailbox_capacity: usize) -> Self {
        Self {
            hub,
            mailbox_capacity,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok((ConnectionInfo, MailboxReceiver))` - 登録した接続と、その Mailbox の読み出し側
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        user_id: UserId,
        username: Username,
        room_id: RoomId,
    ) -> Result<(ConnectionInfo, MailboxReceiver), ConnectError> {
        let (connection, mailbox) =
            Connection::open(user_id, username, room_id, self.mailbox_capacity);

        let info = self
            .hub
            .register_connection(connection)
            .await
            .map_err(|e| match e {
                HubError::DuplicateConnection { user_id, room_id } => {
                    ConnectError::DuplicateConnection {
                        user_id: user_id.into_string(),
                        room_id: room_id.into_string(),
                    }
                }
            })?;

        Ok((info, mailbox))
    }
}
