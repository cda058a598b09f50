//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体を定義し、`execute` で実行します。
//! 依存はすべてコンストラクタで受け取ります。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod get_book;
pub mod get_chat_history;
pub mod get_chat_stats;
pub mod process_book;
pub mod send_message;
pub mod upload_book;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, GetBookError, GetChatHistoryError, ProcessBookError, SendMessageError,
    UploadBookError,
};
pub use get_book::GetBookUseCase;
pub use get_chat_history::{
    DEFAULT_HISTORY_LIMIT, GetChatHistoryUseCase, MAX_HISTORY_LIMIT, normalize_limit,
};
pub use get_chat_stats::{GetChatStatsUseCase, GetOnlineUsersUseCase};
pub use process_book::{ProcessBookUseCase, ProcessOutcome};
pub use send_message::{SendMessageInput, SendMessageUseCase};
pub use upload_book::{UploadBookInput, UploadBookUseCase, UploadedFile};
