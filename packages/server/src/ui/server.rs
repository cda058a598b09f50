//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        chat_history, chat_stats, get_book, get_object, health_check, online_users,
        send_message, upload_book, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Path prefix under which the in-memory blob store's objects are served
pub const LOCAL_BLOB_PATH: &str = "/blobs";

/// Build the application router.
///
/// `upload_limit_bytes` caps the request body of `POST /book/upload`.
pub fn router(state: Arc<AppState>, upload_limit_bytes: usize) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/chat/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/chat/message", post(send_message))
        .route("/chat/history", get(chat_history))
        .route("/chat/online", get(online_users))
        .route("/chat/stats", get(chat_stats))
        .route(
            "/book/upload",
            post(upload_book).layer(DefaultBodyLimit::max(upload_limit_bytes)),
        )
        .route("/book/{id}", get(get_book))
        .route(&format!("{LOCAL_BLOB_PATH}/{{bucket}}/{{*path}}"), get(get_object))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Chat and book ingestion server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, 10 * 1024 * 1024);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    upload_limit_bytes: usize,
}

impl Server {
    pub fn new(state: AppState, upload_limit_bytes: usize) -> Self {
        Self {
            state: Arc::new(state),
            upload_limit_bytes,
        }
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state, self.upload_limit_bytes);

        tracing::info!("Server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/chat/ws", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
