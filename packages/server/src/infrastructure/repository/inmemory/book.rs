//! InMemory Book Repository 実装
//!
//! トランザクションは追加した行を手元に溜め、`commit` 時にまとめて反映します。
//! ID は挿入時に採番するため、ロールバックされた ID は欠番になります（DB の
//! シーケンスと同じ挙動）。

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Book, BookId, BookRepository, BookTransaction, NewBook, RepositoryError};

#[derive(Default)]
struct Store {
    books: RwLock<HashMap<BookId, Book>>,
    next_id: AtomicI64,
}

/// インメモリ Book Repository 実装
#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    store: Arc<Store>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// コミット済みの書籍数
    pub async fn len(&self) -> usize {
        self.store.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn begin(&self) -> Result<Box<dyn BookTransaction>, RepositoryError> {
        Ok(Box::new(InMemoryBookTransaction {
            store: Arc::clone(&self.store),
            staged: Vec::new(),
        }))
    }

    async fn save_first_page(&self, book_id: BookId, url: &str) -> Result<(), RepositoryError> {
        let mut books = self.store.books.write().await;
        let book = books
            .get_mut(&book_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("book {}", book_id)))?;
        book.first_page_url = Some(url.to_string());
        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, RepositoryError> {
        Ok(self.store.books.read().await.get(&book_id).cloned())
    }
}

struct InMemoryBookTransaction {
    store: Arc<Store>,
    staged: Vec<Book>,
}

#[async_trait]
impl BookTransaction for InMemoryBookTransaction {
    async fn insert_book(&mut self, book: &NewBook) -> Result<BookId, RepositoryError> {
        let id = BookId::new(self.store.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.staged.push(book.clone().into_book(id));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut books = self.store.books.write().await;
        for book in self.staged {
            books.insert(book.id, book);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            description: None,
            uploaded_by: UserId::new("alice").unwrap(),
            file_url: format!("http://blob/pdfs/{}.pdf", title),
        }
    }

    #[tokio::test]
    async fn test_committed_book_is_visible() {
        // テスト項目: コミットした書籍は取得でき、表紙 URL は未設定
        // given (前提条件):
        let repo = InMemoryBookRepository::new();
        let mut tx = repo.begin().await.unwrap();
        let id = tx.insert_book(&new_book("earthsea")).await.unwrap();

        // when (操作):
        tx.commit().await.unwrap();

        // then (期待する結果):
        let book = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(book.title, "earthsea");
        assert_eq!(book.first_page_url, None);
    }

    #[tokio::test]
    async fn test_rolled_back_book_is_not_visible() {
        // テスト項目: ロールバックまたはコミットせずに drop した書籍は残らない
        // given (前提条件):
        let repo = InMemoryBookRepository::new();
        let mut tx = repo.begin().await.unwrap();
        let rolled_back = tx.insert_book(&new_book("a")).await.unwrap();
        let mut dropped = repo.begin().await.unwrap();
        let never_committed = dropped.insert_book(&new_book("b")).await.unwrap();

        // when (操作):
        tx.rollback().await.unwrap();
        drop(dropped);

        // then (期待する結果):
        assert!(repo.find_by_id(rolled_back).await.unwrap().is_none());
        assert!(repo.find_by_id(never_committed).await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_first_page_updates_only_that_book() {
        // テスト項目: 表紙 URL の更新は対象の書籍だけに反映される
        // given (前提条件):
        let repo = InMemoryBookRepository::new();
        let mut tx = repo.begin().await.unwrap();
        let first = tx.insert_book(&new_book("a")).await.unwrap();
        let second = tx.insert_book(&new_book("b")).await.unwrap();
        tx.commit().await.unwrap();

        // when (操作):
        repo.save_first_page(first, "http://blob/pages/1/1").await.unwrap();

        // then (期待する結果):
        let first = repo.find_by_id(first).await.unwrap().unwrap();
        let second = repo.find_by_id(second).await.unwrap().unwrap();
        assert_eq!(first.first_page_url.as_deref(), Some("http://blob/pages/1/1"));
        assert_eq!(second.first_page_url, None);
    }

    #[tokio::test]
    async fn test_save_first_page_for_missing_book_fails() {
        // テスト項目: 存在しない書籍の更新は NotFound
        // given (前提条件):
        let repo = InMemoryBookRepository::new();

        // when (操作):
        let result = repo.save_first_page(BookId::new(42), "http://x").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
