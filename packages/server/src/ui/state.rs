//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::infrastructure::InMemoryBlobStore;
use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetBookUseCase,
    GetChatHistoryUseCase, GetChatStatsUseCase, GetOnlineUsersUseCase, SendMessageUseCase,
    UploadBookUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetChatHistoryUseCase（履歴取得のユースケース）
    pub get_chat_history_usecase: Arc<GetChatHistoryUseCase>,
    /// GetChatStatsUseCase（接続状況取得のユースケース）
    pub get_chat_stats_usecase: Arc<GetChatStatsUseCase>,
    /// GetOnlineUsersUseCase（オンラインユーザー取得のユースケース）
    pub get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
    /// UploadBookUseCase（書籍アップロードのユースケース）
    pub upload_book_usecase: Arc<UploadBookUseCase>,
    /// GetBookUseCase（書籍取得のユースケース）
    pub get_book_usecase: Arc<GetBookUseCase>,
    /// Objects served under `/blobs` when no external object store is configured
    pub local_objects: Option<Arc<InMemoryBlobStore>>,
    /// WebSocket ping interval
    pub heartbeat_interval: Duration,
}
