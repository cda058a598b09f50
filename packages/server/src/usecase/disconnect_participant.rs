//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時のルーム削除と、すでに登録されていない接続の扱い
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断
//! - エッジケース：最後の参加者の切断（ルームが消える）
//! - エッジケース：追い出し済みの接続の切断（何もしない）

use std::sync::Arc;

use crate::{domain::ConnectionInfo, infrastructure::ChatHub};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    hub: Arc<ChatHub>,
}

impl DisconnectParticipantUseCase {
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 接続がまだ登録されていて、今回の呼び出しで削除された場合は `true`。
    /// 追い出し済みなどで登録されていなかった場合は `false`。
    pub async fn execute(&self, info: &ConnectionInfo) -> bool {
        self.hub.unregister_connection(info).await
    }
}
