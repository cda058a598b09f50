//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{BlobStoreError, BookId, RenderError, RepositoryError};

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("user '{user_id}' is already connected to room '{room_id}'")]
    DuplicateConnection { user_id: String, room_id: String },
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("failed to persist message: {0}")]
    Persist(#[from] RepositoryError),
}

/// 履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetChatHistoryError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 書籍アップロードのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadBookError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("failed to store the uploaded file: {0}")]
    Upload(#[from] BlobStoreError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 書籍取り込み（バックグラウンド）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessBookError {
    #[error("failed to download source file: {0}")]
    Download(BlobStoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to upload page {page}: {source}")]
    UploadPage { page: usize, source: BlobStoreError },

    #[error("failed to save first page: {0}")]
    Repository(#[from] RepositoryError),

    #[error("rendering task failed: {0}")]
    Join(String),

    #[error("processing timed out")]
    TimedOut,
}

/// 書籍取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetBookError {
    #[error("book {0} not found")]
    NotFound(BookId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
