//! HTTP / WebSocket server implementation.

pub mod auth;
pub mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{LOCAL_BLOB_PATH, Server, router};
pub use signal::shutdown_signal;
