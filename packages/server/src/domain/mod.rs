//! ドメイン層
//!
//! Value Object、エンティティ、外部協調者（DB・オブジェクトストレージ・
//! ページ描画）へのインターフェースを定義します。

pub mod blob_store;
pub mod connection;
pub mod entity;
pub mod error;
pub mod renderer;
pub mod repository;
pub mod value_object;

pub use blob_store::BlobStore;
pub use connection::{Connection, ConnectionInfo, Delivery, DeliveryFailure, MailboxReceiver};
pub use entity::{Book, Message, MessageType, NewBook, Presence};
pub use error::{BlobStoreError, RenderError, RepositoryError, ValueObjectError};
pub use renderer::PageRenderer;
pub use repository::{BookRepository, BookTransaction, ChatRepository};
pub use value_object::{BookId, ConnectionId, MessageContent, MessageId, RoomId, UserId, Username};

#[cfg(test)]
pub use blob_store::MockBlobStore;
