//! UseCase: 書籍アップロード
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UploadBookUseCase::execute() メソッド
//! - 同期部分（元ファイルの保存 → 行の作成 → コミット）とバックグラウンド処理の投入
//!
//! ### なぜこのテストが必要か
//! - 呼び出し元はページ分割の完了を待たずに成功を受け取る必要がある
//! - 同期部分が失敗した場合は行が残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：アップロード直後は表紙 URL が None、処理完了後に設定される
//! - 異常系：必須項目の欠落
//! - 異常系：元ファイルの保存に失敗

use std::{path::Path, sync::Arc};

use uuid::Uuid;

use crate::{
    domain::{BlobStore, Book, BookRepository, NewBook, UserId},
    infrastructure::TaskExecutor,
};

use super::{error::UploadBookError, process_book::ProcessBookUseCase};

/// アップロードされたファイル
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 書籍アップロードの入力
#[derive(Debug, Clone)]
pub struct UploadBookInput {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub uploaded_by: UserId,
    pub file: Option<UploadedFile>,
}

/// 書籍アップロードのユースケース
pub struct UploadBookUseCase {
    books: Arc<dyn BookRepository>,
    blobs: Arc<dyn BlobStore>,
    executor: Arc<TaskExecutor>,
    processor: Arc<ProcessBookUseCase>,
    pdf_bucket: String,
}

impl UploadBookUseCase {
    pub fn new(
        books: Arc<dyn BookRepository>,
        blobs: Arc<dyn BlobStore>,
        executor: Arc<TaskExecutor>,
        processor: Arc<ProcessBookUseCase>,
        pdf_bucket: impl Into<String>,
    ) -> Self {
        Self {
            books,
            blobs,
            executor,
            processor,
            pdf_bucket: pdf_bucket.into(),
        }
    }

    /// 書籍アップロードを実行
    ///
    /// 1. トランザクションを開始
    /// 2. 元ファイルを保存し URL を取得
    /// 3. 書籍の行を作成
    /// 4. コミット
    /// 5. ページ分割をバックグラウンドに投入（書籍 ID と URL のみを渡す）
    ///
    /// 戻り値の書籍は `first_page_url` が `None` の状態です。
    pub async fn execute(&self, input: UploadBookInput) -> Result<Book, UploadBookError> {
        let title = required(input.title, "title")?;
        let author = required(input.author, "author")?;
        let file = input
            .file
            .filter(|f| !f.bytes.is_empty())
            .ok_or(UploadBookError::MissingField("file"))?;
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        // 1. トランザクション開始
        let mut tx = self.books.begin().await?;

        // 2. 元ファイルの保存
        let object_name = object_name_for(file.file_name.as_deref());
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or("application/pdf")
            .to_string();
        let file_url = match self
            .blobs
            .upload(&self.pdf_bucket, &object_name, file.bytes, &content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        // 3. 行の作成
        let new_book = NewBook {
            title,
            author,
            description,
            uploaded_by: input.uploaded_by,
            file_url: file_url.clone(),
        };
        let book_id = match tx.insert_book(&new_book).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Stored file {} has no book row: {}", file_url, e);
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        // 4. コミット
        tx.commit().await?;
        tracing::info!("Book {} created from {}", book_id, file_url);

        // 5. バックグラウンド処理の投入
        let processor = Arc::clone(&self.processor);
        let source_url = file_url;
        let submitted = self.executor.submit(async move {
            if let Err(e) = processor.execute(book_id, &source_url).await {
                tracing::error!("Error processing book {}: {}", book_id, e);
            }
        });
        if let Err(e) = submitted {
            tracing::error!("Book {} will not be processed: {}", book_id, e);
        }

        Ok(new_book.into_book(book_id))
    }
}

fn required(value: String, field: &'static str) -> Result<String, UploadBookError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(UploadBookError::MissingField(field));
    }
    Ok(value.to_string())
}

/// 衝突しないオブジェクト名（`{uuid}{拡張子}`）
fn object_name_for(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{BlobStoreError, MockBlobStore, PageRenderer, RenderError},
        infrastructure::{InMemoryBlobStore, InMemoryBookRepository},
    };
    use std::{
        sync::{Mutex, mpsc},
        time::Duration,
    };

    // 合図があるまで描画を止める PageRenderer
    struct GatedRenderer {
        gate: Mutex<mpsc::Receiver<()>>,
        pages: usize,
    }

    impl GatedRenderer {
        fn new(pages: usize) -> (Self, mpsc::Sender<()>) {
            let (open, gate) = mpsc::channel();
            (
                Self {
                    gate: Mutex::new(gate),
                    pages,
                },
                open,
            )
        }
    }

    impl PageRenderer for GatedRenderer {
        fn render_jpeg_pages(&self, _document: &[u8]) -> Result<Vec<Vec<u8>>, RenderError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(vec![vec![0xFF, 0xD8]; self.pages])
        }
    }

    struct Fixture {
        usecase: UploadBookUseCase,
        books: InMemoryBookRepository,
        executor: Arc<TaskExecutor>,
    }

    fn create_fixture(blobs: Arc<dyn BlobStore>, renderer: Arc<dyn PageRenderer>) -> Fixture {
        let books = InMemoryBookRepository::new();
        let executor = TaskExecutor::new(2);
        let processor = Arc::new(ProcessBookUseCase::new(
            Arc::new(books.clone()),
            blobs.clone(),
            renderer,
            "pages",
            Duration::from_secs(5),
        ));
        let usecase = UploadBookUseCase::new(
            Arc::new(books.clone()),
            blobs,
            executor.clone(),
            processor,
            "pdfs",
        );
        Fixture {
            usecase,
            books,
            executor,
        }
    }

    fn input() -> UploadBookInput {
        UploadBookInput {
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            description: Some("  ".to_string()),
            uploaded_by: UserId::new("alice").unwrap(),
            file: Some(UploadedFile {
                file_name: Some("book.PDF".to_string()),
                content_type: Some("application/pdf".to_string()),
                bytes: b"%PDF-1.7".to_vec(),
            }),
        }
    }

    #[tokio::test]
    async fn test_upload_returns_before_processing_completes() {
        // テスト項目: ページ分割の完了を待たずに成功し、直後は表紙 URL が None
        // given (前提条件):
        let blobs = Arc::new(InMemoryBlobStore::new("http://blob"));
        let (renderer, open_gate) = GatedRenderer::new(2);
        let fixture = create_fixture(blobs.clone(), Arc::new(renderer));

        // when (操作):
        let book = fixture.usecase.execute(input()).await.unwrap();

        // then (期待する結果):
        assert_eq!(book.first_page_url, None);
        assert_eq!(book.description, None);
        assert!(book.file_url.starts_with("http://blob/pdfs/"));
        assert!(book.file_url.ends_with(".pdf"));
        let stored = fixture.books.find_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(stored.first_page_url, None);

        // 描画を進めて処理の完了を待つ
        open_gate.send(()).unwrap();
        fixture.executor.stop_wait().await;
        let stored = fixture.books.find_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(
            stored.first_page_url,
            Some(format!("http://blob/pages/{}/1", book.id))
        );
        assert!(blobs.get(&format!("http://blob/pages/{}/2", book.id)).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        // テスト項目: タイトル・著者・ファイルが無い場合は MissingField
        // given (前提条件):
        let (renderer, _open_gate) = GatedRenderer::new(0);
        let fixture = create_fixture(
            Arc::new(InMemoryBlobStore::new("http://blob")),
            Arc::new(renderer),
        );
        let no_title = UploadBookInput {
            title: " ".to_string(),
            ..input()
        };
        let no_file = UploadBookInput {
            file: None,
            ..input()
        };

        // when (操作):
        let no_title = fixture.usecase.execute(no_title).await;
        let no_file = fixture.usecase.execute(no_file).await;

        // then (期待する結果):
        assert_eq!(no_title, Err(UploadBookError::MissingField("title")));
        assert_eq!(no_file, Err(UploadBookError::MissingField("file")));
        assert!(fixture.books.is_empty().await);
    }

    #[tokio::test]
    async fn test_blob_failure_leaves_no_row() {
        // テスト項目: 元ファイルの保存に失敗した場合は行が作られない
        // given (前提条件):
        let mut blobs = MockBlobStore::new();
        blobs.expect_upload().times(1).returning(|bucket, path, _, _| {
            Err(BlobStoreError::Upload {
                bucket: bucket.to_string(),
                path: path.to_string(),
                reason: "bucket missing".to_string(),
            })
        });
        blobs.expect_download().never();
        let (renderer, _open_gate) = GatedRenderer::new(0);
        let fixture = create_fixture(Arc::new(blobs), Arc::new(renderer));

        // when (操作):
        let result = fixture.usecase.execute(input()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(UploadBookError::Upload(_))));
        assert!(fixture.books.is_empty().await);
    }

    #[test]
    fn test_object_name_keeps_lowercase_extension() {
        // テスト項目: オブジェクト名は UUID + 小文字の拡張子
        assert!(object_name_for(Some("Dune.PDF")).ends_with(".pdf"));
        assert!(!object_name_for(None).contains('.'));
    }
}
