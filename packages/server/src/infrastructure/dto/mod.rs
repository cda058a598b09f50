//! Data Transfer Objects (DTOs) for the chat and book APIs.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame envelopes
//! - `http`: HTTP API request/response bodies
//! - `conversion`: Domain entity → DTO conversions

pub mod conversion;
pub mod http;
pub mod websocket;
