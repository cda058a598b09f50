//! Request handlers.

mod blob;
mod book;
mod chat;
mod http;
mod websocket;

pub use blob::get_object;
pub use book::{get_book, upload_book};
pub use chat::{chat_history, chat_stats, online_users, send_message};
pub use http::health_check;
pub use websocket::websocket_handler;
