//! PostgreSQL Book Repository 実装

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::db_error;
use crate::domain::{
    Book, BookId, BookRepository, BookTransaction, NewBook, RepositoryError, UserId,
};

type BookRow = (
    i64,
    String,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
);

pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn begin(&self) -> Result<Box<dyn BookTransaction>, RepositoryError> {
        let tx = self.pool.begin().await.map_err(db_error)?;
        Ok(Box::new(PgBookTransaction { tx }))
    }

    async fn save_first_page(&self, book_id: BookId, url: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE books SET first_page_url = $1 WHERE id = $2")
            .bind(url)
            .bind(book_id.value())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("book {}", book_id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            SELECT id, title, author, description, uploaded_by, file_url, first_page_url
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(book_from_row).transpose()
    }
}

/// `commit` されずに drop された場合は sqlx がロールバックする
struct PgBookTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BookTransaction for PgBookTransaction {
    async fn insert_book(&mut self, book: &NewBook) -> Result<BookId, RepositoryError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO books (title, description, author, uploaded_by, file_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.description.as_deref())
        .bind(&book.author)
        .bind(book.uploaded_by.as_str())
        .bind(&book.file_url)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error)?;

        Ok(BookId::new(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await.map_err(db_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await.map_err(db_error)
    }
}

fn book_from_row(row: BookRow) -> Result<Book, RepositoryError> {
    let (id, title, author, description, uploaded_by, file_url, first_page_url) = row;
    let uploaded_by = UserId::new(uploaded_by)
        .map_err(|e| RepositoryError::CorruptRow(format!("books {}: {}", id, e)))?;

    Ok(Book {
        id: BookId::new(id),
        title,
        author,
        description,
        uploaded_by,
        file_url,
        first_page_url,
    })
}
