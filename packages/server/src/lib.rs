//! Reading-room chat hub and book ingestion server.
//!
//! Layers:
//! - `domain`: value objects, entities and the interfaces of external collaborators
//! - `infrastructure`: task executor, chat hub, storage and rendering implementations
//! - `usecase`: one struct per operation
//! - `ui`: axum router, handlers and server lifecycle

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
