//! UseCase: 書籍の取り込み（バックグラウンド）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ProcessBookUseCase::execute() メソッド
//! - ページ画像のアップロード先（`{book_id}/{page}`）と表紙 URL の保存
//!
//! ### なぜこのテストが必要か
//! - 表紙 URL は全ページのアップロードが成功した後にだけ保存する必要がある
//! - 0 ページのドキュメントで範囲外アクセスをしないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 ページのドキュメント
//! - エッジケース：0 ページのドキュメント
//! - 異常系：途中のページでアップロードに失敗
//! - 異常系：描画に失敗

use std::{sync::Arc, time::Duration};

use crate::domain::{BlobStore, BookId, BookRepository, PageRenderer};

use super::error::ProcessBookError;

/// ページ画像の Content-Type
pub const PAGE_CONTENT_TYPE: &str = "image/jpeg";

/// 取り込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// アップロードしたページの URL（1 ページ目が先頭）
    pub page_urls: Vec<String>,
}

impl ProcessOutcome {
    pub fn first_page_url(&self) -> Option<&str> {
        self.page_urls.first().map(String::as_str)
    }
}

/// 書籍取り込みのユースケース
///
/// 元のリクエストのトランザクションには依存せず、書籍 ID と元ファイルの URL
/// だけを受け取って自前の接続で表紙 URL を保存します。
pub struct ProcessBookUseCase {
    books: Arc<dyn BookRepository>,
    blobs: Arc<dyn BlobStore>,
    renderer: Arc<dyn PageRenderer>,
    pages_bucket: String,
    /// リクエストとは独立したタイムアウト
    timeout: Duration,
}

impl ProcessBookUseCase {
    pub fn new(
        books: Arc<dyn BookRepository>,
        blobs: Arc<dyn BlobStore>,
        renderer: Arc<dyn PageRenderer>,
        pages_bucket: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            books,
            blobs,
            renderer,
            pages_bucket: pages_bucket.into(),
            timeout,
        }
    }

    /// 取り込みを実行
    ///
    /// 1. 元ファイルをダウンロード
    /// 2. 全ページを JPEG に描画（ブロッキングスレッドで実行）
    /// 3. 各ページを `{book_id}/{page}` にアップロード
    /// 4. 全ページ成功した場合のみ、1 ページ目の URL を保存
    pub async fn execute(
        &self,
        book_id: BookId,
        source_url: &str,
    ) -> Result<ProcessOutcome, ProcessBookError> {
        tokio::time::timeout(self.timeout, self.run(book_id, source_url))
            .await
            .map_err(|_| ProcessBookError::TimedOut)?
    }

    async fn run(
        &self,
        book_id: BookId,
        source_url: &str,
    ) -> Result<ProcessOutcome, ProcessBookError> {
        // 1. ダウンロード
        let document = self
            .blobs
            .download(source_url)
            .await
            .map_err(ProcessBookError::Download)?;

        // 2. 描画
        let renderer = Arc::clone(&self.renderer);
        let pages = tokio::task::spawn_blocking(move || renderer.render_jpeg_pages(&document))
            .await
            .map_err(|e| ProcessBookError::Join(e.to_string()))??;

        // 3. アップロード
        let mut page_urls = Vec::with_capacity(pages.len());
        for (index, bytes) in pages.into_iter().enumerate() {
            let page = index + 1;
            let path = format!("{}/{}", book_id, page);
            let url = self
                .blobs
                .upload(&self.pages_bucket, &path, bytes, PAGE_CONTENT_TYPE)
                .await
                .map_err(|source| ProcessBookError::UploadPage { page, source })?;
            page_urls.push(url);
        }

        // 4. 表紙 URL の保存
        let outcome = ProcessOutcome { page_urls };
        match outcome.first_page_url() {
            Some(url) => {
                self.books.save_first_page(book_id, url).await?;
                tracing::info!(
                    "Book {} processed: {} pages, first page at {}",
                    book_id,
                    outcome.page_urls.len(),
                    url
                );
            }
            None => {
                tracing::info!("Book {} has no pages; first page left empty", book_id);
            }
        }

        Ok(outcome)
    }
}
