//! InMemory BlobStore 実装
//!
//! `{base_url}/{bucket}/{path}` を公開 URL とみなしてオブジェクトを保持します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{BlobStore, BlobStoreError};

/// 保存されたオブジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct InMemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn url_for(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, bucket, path)
    }

    /// 公開 URL でオブジェクトを参照
    pub async fn get(&self, url: &str) -> Option<StoredObject> {
        self.objects.read().await.get(url).cloned()
    }

    /// バケットとパスでオブジェクトを参照
    pub async fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.get(&self.url_for(bucket, path)).await
    }

    /// 保存済みの URL 一覧（昇順）
    pub async fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.objects.read().await.keys().cloned().collect();
        urls.sort();
        urls
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        let url = self.url_for(bucket, path);
        self.objects.write().await.insert(
            url.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.get(url)
            .await
            .map(|object| object.bytes)
            .ok_or_else(|| BlobStoreError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uploaded_object_is_downloadable_by_url() {
        // テスト項目: upload が返す URL で同じ内容を取得できる
        // given (前提条件):
        let store = InMemoryBlobStore::new("http://blob.local/");

        // when (操作):
        let url = store
            .upload("pages", "7/1", vec![0xFF, 0xD8], "image/jpeg")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(url, "http://blob.local/pages/7/1");
        assert_eq!(store.download(&url).await.unwrap(), vec![0xFF, 0xD8]);
        assert_eq!(store.get(&url).await.unwrap().content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        // テスト項目: 存在しない URL は NotFound
        // given (前提条件):
        let store = InMemoryBlobStore::new("http://blob.local");

        // when (操作):
        let result = store.download("http://blob.local/pdfs/none.pdf").await;

        // then (期待する結果):
        assert!(matches!(result, Err(BlobStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_object_is_found_by_bucket_and_path() {
        // テスト項目: バケットとパスからアップロード済みのオブジェクトを引ける
        // given (前提条件):
        let store = InMemoryBlobStore::new("http://blob.local/blobs");
        store
            .upload("pages", "3/1", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();

        // when (操作):
        let found = store.object("pages", "3/1").await;
        let missing = store.object("pages", "3/2").await;

        // then (期待する結果):
        assert_eq!(
            found,
            Some(StoredObject {
                bytes: vec![1, 2, 3],
                content_type: "image/jpeg".to_string(),
            })
        );
        assert_eq!(missing, None);
    }
}
