//! ページ描画のインターフェース

use super::error::RenderError;

/// ページ単位のドキュメントを JPEG 画像列に変換する
///
/// CPU バウンドな同期処理です。非同期コンテキストからは
/// `tokio::task::spawn_blocking` 経由で呼び出してください。
pub trait PageRenderer: Send + Sync {
    /// 各ページを描画して JPEG にエンコードする（1 ページ目が先頭）
    fn render_jpeg_pages(&self, document: &[u8]) -> Result<Vec<Vec<u8>>, RenderError>;
}
