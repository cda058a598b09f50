//! Infrastructure 層
//!
//! ドメイン層のインターフェースの具体的な実装（Repository、BlobStore、
//! PageRenderer）と、並行処理の中核（TaskExecutor、ChatHub）を提供します。

pub mod blob_store;
pub mod dto;
pub mod executor;
pub mod hub;
pub mod renderer;
pub mod repository;

pub use blob_store::{HttpBlobStore, InMemoryBlobStore};
pub use executor::{ExecutorError, TaskExecutor};
pub use hub::{BroadcastReport, ChatHub, ChatStats, HubError};
pub use renderer::PdfiumRenderer;
pub use repository::{
    InMemoryBookRepository, InMemoryChatRepository, PgBookRepository, PgChatRepository,
    connect_pool,
};
