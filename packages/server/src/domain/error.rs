//! ドメイン層のエラー型
//!
//! 外部の協調者（DB、オブジェクトストレージ、PDF レンダラ）の失敗は、
//! ここで定義する型に変換されてからユースケース層に渡されます。

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} is required")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("unknown message type '{0}'")]
    UnknownMessageType(String),
}

/// Repository の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("stored row is invalid: {0}")]
    CorruptRow(String),
}

/// オブジェクトストレージの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobStoreError {
    #[error("failed to upload {bucket}/{path}: {reason}")]
    Upload {
        bucket: String,
        path: String,
        reason: String,
    },

    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("object not found: {0}")]
    NotFound(String),
}

/// PDF のページ描画エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("failed to open document: {0}")]
    Open(String),

    #[error("failed to render page {page}: {reason}")]
    Render { page: usize, reason: String },

    #[error("failed to encode page {page}: {reason}")]
    Encode { page: usize, reason: String },
}
