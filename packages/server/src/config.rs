//! Server configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "lectern-server")]
#[command(about = "Reading-room chat and book ingestion server", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "LECTERN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "LECTERN_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Background workers shared by presence notices and book processing
    #[arg(long, env = "LECTERN_WORKERS", default_value_t = 100)]
    pub workers: usize,

    /// Outbound queue size per WebSocket connection
    #[arg(long, env = "LECTERN_MAILBOX_CAPACITY", default_value_t = 256)]
    pub mailbox_capacity: usize,

    /// Interval between WebSocket pings; a peer silent for two intervals is dropped
    #[arg(long, env = "LECTERN_HEARTBEAT_SECS", default_value_t = 30)]
    pub heartbeat_secs: u64,

    /// Upper bound for processing one uploaded book
    #[arg(long, env = "LECTERN_BOOK_TIMEOUT_SECS", default_value_t = 1800)]
    pub book_timeout_secs: u64,

    /// PostgreSQL URL; in-memory repositories are used when absent
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Object store endpoint; an in-memory store is used when absent
    #[arg(long, env = "LECTERN_BLOB_ENDPOINT")]
    pub blob_endpoint: Option<String>,

    /// Externally reachable base URL of this server, used for objects it serves itself
    #[arg(long, env = "LECTERN_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Bucket for uploaded PDF files
    #[arg(long, env = "LECTERN_PDF_BUCKET", default_value = "pdfs")]
    pub pdf_bucket: String,

    /// Bucket for rendered page images
    #[arg(long, env = "LECTERN_PAGES_BUCKET", default_value = "pages")]
    pub pages_bucket: String,

    /// Maximum size of a book upload request
    #[arg(long, env = "LECTERN_UPLOAD_LIMIT_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub upload_limit_bytes: usize,

    /// Directory containing the pdfium shared library (system library when absent)
    #[arg(long, env = "PDFIUM_LIBRARY_DIR")]
    pub pdfium_dir: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LECTERN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn book_timeout(&self) -> Duration {
        Duration::from_secs(self.book_timeout_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.max(1))
    }

    /// `--public-url`, or the bind address when it is not given
    pub fn public_base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしの場合は既定値になる
        // given (前提条件):
        let args = ["lectern-server"];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 100);
        assert_eq!(config.mailbox_capacity, 256);
        assert_eq!(config.book_timeout(), Duration::from_secs(30 * 60));
        assert_eq!(config.pdf_bucket, "pdfs");
        assert_eq!(config.pages_bucket, "pages");
        assert_eq!(config.upload_limit_bytes, 10 << 20);
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_flags_override_defaults() {
        // テスト項目: 引数で既定値を上書きできる
        // given (前提条件):
        let args = [
            "lectern-server",
            "--port",
            "3000",
            "--workers",
            "4",
            "--blob-endpoint",
            "http://minio:9000",
        ];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 3000);
        assert_eq!(config.workers, 4);
        assert_eq!(config.blob_endpoint.as_deref(), Some("http://minio:9000"));
    }

    #[test]
    fn test_public_base_url_falls_back_to_bind_address() {
        // テスト項目: 公開 URL が無い場合はバインドアドレスから組み立てる
        // given (前提条件):
        let bound = ServerConfig::try_parse_from(["lectern-server", "--port", "3000"]).unwrap();
        let public = ServerConfig::try_parse_from([
            "lectern-server",
            "--public-url",
            "https://lectern.example/",
        ])
        .unwrap();

        // when (操作):
        let bound_url = bound.public_base_url();
        let public_url = public.public_base_url();

        // then (期待する結果):
        assert_eq!(bound_url, "http://127.0.0.1:3000");
        assert_eq!(public_url, "https://lectern.example");
    }
}
