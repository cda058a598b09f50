//! UseCase: 接続状況の取得

use std::sync::Arc;

use crate::{
    domain::{RoomId, Username},
    infrastructure::{ChatHub, ChatStats},
};

/// 接続状況（接続数・アクティブなルーム・オンラインユーザー）取得のユースケース
pub struct GetChatStatsUseCase {
    hub: Arc<ChatHub>,
}

impl GetChatStatsUseCase {
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    pub async fn execute(&self) -> ChatStats {
        self.hub.stats().await
    }
}

/// オンラインユーザー取得のユースケース
pub struct GetOnlineUsersUseCase {
    hub: Arc<ChatHub>,
}

impl GetOnlineUsersUseCase {
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// `room_id` を指定した場合はそのルーム、省略時は全ルームのユーザー
    pub async fn execute(&self, room_id: Option<&RoomId>) -> Vec<Username> {
        match room_id {
            Some(room_id) => self.hub.members_of(room_id).await,
            None => self.hub.stats().await.users,
        }
    }
}
