//! Connection と Mailbox
//!
//! Mailbox は接続ごとの有界キューで、書き込み側は Hub のみ、読み出し側は
//! 接続の送信ループのみです。`Connection` が破棄されると送信側が drop され、
//! 読み出し側は `None` を受け取って終了します（close は常に 1 回だけ）。

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{
    entity::Message,
    value_object::{ConnectionId, RoomId, UserId, Username},
};

/// Mailbox に積まれる 1 件の配信
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message: Message,
    /// 配信時点のルームのオンライン人数
    pub online_users: usize,
}

/// Mailbox の読み出し側
pub type MailboxReceiver = mpsc::Receiver<Arc<Delivery>>;

/// 接続の識別情報（Hub に登録した後も呼び出し側が保持できる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub username: Username,
    pub room_id: RoomId,
}

/// 1 本のライブ接続
///
/// 登録後は Hub が排他的に所有します。
#[derive(Debug)]
pub struct Connection {
    info: ConnectionInfo,
    mailbox: mpsc::Sender<Arc<Delivery>>,
}

/// Mailbox への配信失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// 読み出しが追いついていない
    Full,
    /// 読み出し側がすでに終了している
    Closed,
}

impl Connection {
    /// 新しい接続と、その Mailbox の読み出し側を生成
    ///
    /// `capacity` が 0 の場合は 1 として扱います。
    pub fn open(
        user_id: UserId,
        username: Username,
        room_id: RoomId,
        capacity: usize,
    ) -> (Self, MailboxReceiver) {
        let (mailbox, receiver) = mpsc::channel(capacity.max(1));
        let info = ConnectionInfo {
            id: ConnectionId::generate(),
            user_id,
            username,
            room_id,
        };
        (Self { info, mailbox }, receiver)
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// ブロックせずに配信を試みる
    pub(crate) fn try_deliver(&self, delivery: Arc<Delivery>) -> Result<(), DeliveryFailure> {
        self.mailbox.try_send(delivery).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryFailure::Full,
            TrySendError::Closed(_) => DeliveryFailure::Closed,
        })
    }
}
