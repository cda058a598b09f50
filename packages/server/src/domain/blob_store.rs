//! オブジェクトストレージのインターフェース

use async_trait::async_trait;

use super::error::BlobStoreError;

/// バケット + パスでオブジェクトを保存し、公開 URL で取得するストレージ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// オブジェクトを保存して公開 URL を返す
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError>;

    /// 公開 URL からオブジェクトを取得
    async fn download(&self, url: &str) -> Result<Vec<u8>, BlobStoreError>;
}
