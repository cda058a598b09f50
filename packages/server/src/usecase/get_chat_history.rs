//! UseCase: チャット履歴取得

use std::sync::Arc;

use crate::domain::{ChatRepository, Message, RoomId};

use super::error::GetChatHistoryError;

/// limit が未指定・不正な場合の件数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// 1 回に取得できる最大件数
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// クエリ文字列の limit を正規化する
///
/// 数値でない値や 0 以下は既定値、上限を超える値は上限に丸める。
pub fn normalize_limit(raw: Option<&str>) -> usize {
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) if n > 0 => usize::try_from(n).map_or(MAX_HISTORY_LIMIT, |n| n.min(MAX_HISTORY_LIMIT)),
        _ => DEFAULT_HISTORY_LIMIT,
    }
}

/// チャット履歴取得のユースケース
pub struct GetChatHistoryUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetChatHistoryUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// ルームの最新 `limit` 件を古い順に取得
    pub async fn execute(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<Message>, GetChatHistoryError> {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        Ok(self.repository.messages_by_room(room_id, limit).await?)
    }
}
