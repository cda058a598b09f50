//! BlobStore 実装

mod http;
mod inmemory;

pub use http::HttpBlobStore;
pub use inmemory::{InMemoryBlobStore, StoredObject};
