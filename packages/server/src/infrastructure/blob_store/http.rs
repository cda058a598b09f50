//! HTTP BlobStore 実装
//!
//! S3 互換のパス形式（`PUT {endpoint}/{bucket}/{path}`）でオブジェクトを保存し、
//! 同じ URL を公開 URL として返します。

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};

use crate::domain::{BlobStore, BlobStoreError};

pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
}

impl HttpBlobStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            bucket.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        let url = self.object_url(bucket, path);
        let upload_error = |reason: String| BlobStoreError::Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            reason,
        };

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upload_error(format!("status {}", response.status())));
        }

        tracing::debug!("Uploaded {}", url);
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, BlobStoreError> {
        let download_error = |reason: String| BlobStoreError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BlobStoreError::NotFound(url.to_string())),
            status if !status.is_success() => Err(download_error(format!("status {}", status))),
            _ => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| download_error(e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }
}
