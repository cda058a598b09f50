//! Chat Hub
//!
//! ## 責務
//!
//! - ルーム → ユーザー → 接続 の対応表を唯一の正として保持
//! - 接続の登録・登録解除と、入退室通知の非同期送信
//! - ルーム内へのブロードキャスト（遅い受信者は切断して他を止めない）
//!
//! ## 設計ノート
//!
//! 状態は単一の `RwLock` で保護します（専用のイベントループは持ちません）。
//! 変更は常に書き込みロック、統計などの参照は読み取りロックで行います。
//! ロックは短時間のみ保持し、永続化などの I/O の間は保持しません。
//!
//! 不変条件:
//! - 対応表に存在するルームは必ず 1 件以上の接続を持つ
//! - 同じルームに同じユーザーの接続は 1 つまで

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use lectern_shared::time::Clock;

use crate::domain::{
    ChatRepository, Connection, ConnectionInfo, Delivery, DeliveryFailure, Message, Presence,
    RepositoryError, RoomId, UserId, Username,
};

use super::executor::TaskExecutor;

type Rooms = HashMap<RoomId, HashMap<UserId, Connection>>;

/// Hub の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("user '{user_id}' is already connected to room '{room_id}'")]
    DuplicateConnection { user_id: UserId, room_id: RoomId },
}

/// 接続状況のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatStats {
    /// 全ルームの接続数の合計
    pub count: usize,
    /// アクティブなルーム（昇順）
    pub rooms: Vec<RoomId>,
    /// オンラインユーザーの表示名（昇順、ルームをまたいだ重複は 1 つにまとめる）
    pub users: Vec<Username>,
}

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Mailbox に積めた接続数
    pub delivered: usize,
    /// Mailbox が詰まっていた（または閉じていた）ため切断した接続
    pub evicted: Vec<ConnectionInfo>,
}

/// Chat Hub
pub struct ChatHub {
    rooms: RwLock<Rooms>,
    repository: Arc<dyn ChatRepository>,
    executor: Arc<TaskExecutor>,
    clock: Arc<dyn Clock>,
}

impl ChatHub {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        executor: Arc<TaskExecutor>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Self {
            rooms: RwLock::new(HashMap::new()),
            repository,
            executor,
            clock,
        })
    }

    /// 接続をルームに登録する
    ///
    /// ルームが無ければ作成します。入室通知は Executor 経由で送るため、
    /// この呼び出しがファンアウトを待つことはありません。
    ///
    /// # Errors
    ///
    /// 同じユーザーがすでに同じルームに接続している場合は
    /// `HubError::DuplicateConnection`（渡された接続は破棄され、Mailbox は閉じる）。
    pub async fn register_connection(
        self: &Arc<Self>,
        connection: Connection,
    ) -> Result<ConnectionInfo, HubError> {
        let info = connection.info().clone();

        let online = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.entry(info.room_id.clone()).or_default();
            if room.contains_key(&info.user_id) {
                // entry() が空のルームを作った可能性は無い（既存ユーザーがいる）
                return Err(HubError::DuplicateConnection {
                    user_id: info.user_id,
                    room_id: info.room_id,
                });
            }
            room.insert(info.user_id.clone(), connection);
            room.len()
        };

        tracing::info!(
            "User '{}' connected to room '{}'. Online: {}",
            info.username,
            info.room_id,
            online
        );

        self.announce(&info, Presence::Joined);
        Ok(info)
    }

    /// 接続を登録解除する
    ///
    /// 最後の接続だった場合はルームも削除します。Mailbox は接続の破棄と同時に
    /// 1 度だけ閉じられます。登録されていない（すでに切断・追い出し済みの）
    /// 接続に対しては何もせず `false` を返します。
    pub async fn unregister_connection(self: &Arc<Self>, info: &ConnectionInfo) -> bool {
        let removed = {
            let mut rooms = self.rooms.write().await;
            remove_member(&mut rooms, info)
        };

        match removed {
            Some(connection) => {
                drop(connection);
                tracing::info!(
                    "User '{}' disconnected from room '{}'",
                    info.username,
                    info.room_id
                );
                self.announce(info, Presence::Left);
                true
            }
            None => {
                tracing::debug!(
                    "Connection {} of '{}' is no longer registered",
                    info.id,
                    info.user_id
                );
                false
            }
        }
    }

    /// メッセージを永続化し、ルームの全接続にブロックせずに配信する
    ///
    /// Mailbox が満杯の接続は、明示的に切断した場合と同じ扱いで追い出します。
    /// 1 つの遅い受信者が他の受信者への配信を止めることはありません。
    ///
    /// # Errors
    ///
    /// 永続化に失敗した場合はそのエラーを返す（配信は行わない）。
    pub async fn broadcast_message(
        self: &Arc<Self>,
        message: Message,
    ) -> Result<BroadcastReport, RepositoryError> {
        self.repository.create_message(&message).await?;

        let report = {
            let mut rooms = self.rooms.write().await;
            fan_out(&mut rooms, message)
        };

        for info in &report.evicted {
            tracing::warn!(
                "Evicted slow connection of '{}' from room '{}'",
                info.username,
                info.room_id
            );
            self.announce(info, Presence::Left);
        }

        Ok(report)
    }

    /// 接続状況のスナップショットを取得
    pub async fn stats(&self) -> ChatStats {
        let rooms = self.rooms.read().await;

        let mut active: Vec<RoomId> = rooms.keys().cloned().collect();
        active.sort();

        let users: BTreeSet<Username> = rooms
            .values()
            .flat_map(|room| room.values().map(|c| c.info().username.clone()))
            .collect();

        ChatStats {
            count: rooms.values().map(HashMap::len).sum(),
            rooms: active,
            users: users.into_iter().collect(),
        }
    }

    /// ルームのオンライン人数
    pub async fn online_in_room(&self, room_id: &RoomId) -> usize {
        self.rooms.read().await.get(room_id).map_or(0, HashMap::len)
    }

    /// ルームに接続中のユーザーの表示名（昇順）
    pub async fn members_of(&self, room_id: &RoomId) -> Vec<Username> {
        let rooms = self.rooms.read().await;
        let mut members: Vec<Username> = rooms
            .get(room_id)
            .map(|room| room.values().map(|c| c.info().username.clone()).collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// 入退室通知を Executor に投入
    fn announce(self: &Arc<Self>, info: &ConnectionInfo, presence: Presence) {
        let hub = Arc::clone(self);
        let room_id = info.room_id.clone();
        let username = info.username.clone();

        let submitted = self.executor.submit(async move {
            let notice = Message::presence_notice(room_id, presence, &username, hub.clock.now());
            if let Err(e) = hub.broadcast_message(notice).await {
                tracing::error!("Failed to broadcast presence notice: {}", e);
            }
        });

        if let Err(e) = submitted {
            tracing::warn!(
                "Dropped presence notice for '{}' in room '{}': {}",
                info.username,
                info.room_id,
                e
            );
        }
    }
}

/// `info` と同一の接続（ID 一致）だけを削除し、空になったルームも削除する
fn remove_member(rooms: &mut Rooms, info: &ConnectionInfo) -> Option<Connection> {
    let room = rooms.get_mut(&info.room_id)?;
    let is_same_connection = room
        .get(&info.user_id)
        .is_some_and(|c| c.info().id == info.id);
    if !is_same_connection {
        return None;
    }

    let removed = room.remove(&info.user_id);
    if room.is_empty() {
        rooms.remove(&info.room_id);
    }
    removed
}

/// ルームの接続へ配信し、失敗した接続を取り除く
///
/// 走査中にマップを変更しないよう、追い出し対象を集めてから削除します。
fn fan_out(rooms: &mut Rooms, message: Message) -> BroadcastReport {
    let room_id = message.room_id.clone();
    let Some(room) = rooms.get_mut(&room_id) else {
        return BroadcastReport::default();
    };

    let delivery = Arc::new(Delivery {
        message,
        online_users: room.len(),
    });

    let mut delivered = 0;
    let mut failed = Vec::new();
    for (user_id, connection) in room.iter() {
        match connection.try_deliver(delivery.clone()) {
            Ok(()) => {
                delivered += 1;
                tracing::debug!("Delivered message {} to '{}'", delivery.message.id, user_id);
            }
            Err(DeliveryFailure::Full) | Err(DeliveryFailure::Closed) => {
                failed.push(user_id.clone());
            }
        }
    }

    let evicted = failed
        .iter()
        .filter_map(|user_id| room.remove(user_id))
        .map(|connection| connection.info().clone())
        .collect();

    if room.is_empty() {
        rooms.remove(&room_id);
    }

    BroadcastReport { delivered, evicted }
}
