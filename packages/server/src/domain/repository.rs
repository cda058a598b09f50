//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Book, Message, NewBook},
    error::RepositoryError,
    value_object::{BookId, RoomId},
};

/// チャットメッセージの永続化
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// メッセージを保存
    async fn create_message(&self, message: &Message) -> Result<(), RepositoryError>;

    /// ルームの最新 `limit` 件を古い順に取得
    async fn messages_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError>;
}

/// 書籍の永続化
///
/// 書籍の作成はトランザクション内で行い、表紙 URL の更新は呼び出し元の
/// トランザクションとは独立した接続で行います（バックグラウンドタスクは
/// 元のトランザクションが終了した後に動くため）。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// トランザクションを開始
    async fn begin(&self) -> Result<Box<dyn BookTransaction>, RepositoryError>;

    /// 1 ページ目の URL を保存
    async fn save_first_page(&self, book_id: BookId, url: &str) -> Result<(), RepositoryError>;

    /// ID で書籍を取得
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, RepositoryError>;
}

/// 書籍作成用のトランザクション
///
/// `commit` されずに drop された場合はロールバックされます。
#[async_trait]
pub trait BookTransaction: Send {
    /// 書籍を追加し、採番された ID を返す
    async fn insert_book(&mut self, book: &NewBook) -> Result<BookId, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
