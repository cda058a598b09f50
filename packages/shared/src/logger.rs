//! Logging setup for the Lectern binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library and the binary log at `default_log_level` unless
/// `RUST_LOG` says otherwise. `tower_http` is included so request traces show
/// up at the same level.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "lectern_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use lectern_shared::logger::setup_logger;
///
/// setup_logger("lectern_server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "lectern_server={level},{binary}={level},tower_http={level}",
                    level = default_log_level,
                    binary = binary_name.replace('-', "_"),
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
