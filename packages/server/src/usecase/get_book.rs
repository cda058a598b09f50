//! UseCase: 書籍取得

use std::sync::Arc;

use crate::domain::{Book, BookId, BookRepository};

use super::error::GetBookError;

/// 書籍取得のユースケース
///
/// 取り込みが終わっていない書籍は `first_page_url` が `None` のまま返ります。
pub struct GetBookUseCase {
    repository: Arc<dyn BookRepository>,
}

impl GetBookUseCase {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, book_id: BookId) -> Result<Book, GetBookError> {
        self.repository
            .find_by_id(book_id)
            .await?
            .ok_or(GetBookError::NotFound(book_id))
    }
}
