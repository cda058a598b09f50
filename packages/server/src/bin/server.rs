//! Lectern backend: room chat over WebSocket/HTTP and background book ingestion.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lectern-server
//! cargo run --bin lectern-server -- --host 0.0.0.0 --port 3000
//! DATABASE_URL=postgres://localhost/lectern cargo run --bin lectern-server
//! ```

use clap::Parser;
use lectern_server::{
    app::{App, Collaborators, Settings},
    config::ServerConfig,
    ui::Server,
};
use lectern_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. External collaborators (DB, object storage, renderer)
    // 2. Executor, Hub, UseCases, AppState
    // 3. Server
    // 4. Drain background jobs

    // 1. External collaborators
    let collaborators = match Collaborators::from_config(&config).await {
        Ok(collaborators) => collaborators,
        Err(e) => {
            tracing::error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Wire the application
    let App { executor, state, .. } = App::build(&Settings::from(&config), collaborators);

    // 3. Create and run the server
    let server = Server::new(state, config.upload_limit_bytes);
    if let Err(e) = server.run(config.host.clone(), config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // 4. Wait for in-flight book processing and notices
    tracing::info!("Waiting for background tasks to finish");
    executor.stop_wait().await;
}
