//! Observability and structured logging infrastructure.
//!
//! This module provides production-grade logging using the tracing framework,
//! enabling filtering, performance profiling, and production observability.
//!
//! # Features
//!
//! - **Structured Logging**: Key-value pairs for machine-parseable logs
//! - **Span Tracking**: Trace operations across async boundaries
//! - **Multiple Formats**: Console (pretty/JSON) and file output
//! - **Environment Filtering**: RUST_LOG variable support
//!
//! # Usage
//!
//! Initialize tracing at application startup:
//!
//! ```no_run
//! use eth_uniswap_v3_alloy::observability;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Initialize with defaults (pretty console output, info level).
//!     // Hold the guard so buffered file logs flush on exit.
//!     let _guard = observability::init_tracing(None, None, false)?;
//!
//!     // Run application...
//!     Ok(())
//! }
//! ```
//!
//! # Environment Configuration
//!
//! Control logging via environment variables:
//!
//! ```bash
//! # Set log level for all modules
//! RUST_LOG=debug cargo run
//!
//! # Component-specific levels
//! RUST_LOG=eth_uniswap_v3_alloy=debug,hyper=warn cargo run
//!
//! # Enable JSON output for production
//! LOG_JSON=true cargo run
//!
//! # Write logs to file with daily rotation
//! LOG_FILE=./logs/swap.log cargo run
//! ```

use crate::error::{SwapError, SwapResult};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Initialize the tracing subscriber with configurable output formats.
///
/// This function sets up structured logging for the application, with support for:
/// - Console output (pretty-printed for development, JSON for production)
/// - Optional file output with daily rotation
/// - Environment-based filtering via RUST_LOG
///
/// # Arguments
///
/// * `log_level` - Optional log level override (e.g., "debug", "info").
///                 Falls back to RUST_LOG environment variable.
/// * `log_file` - Optional file path for log output. Enables daily log rotation.
/// * `json_output` - If true, outputs JSON format suitable for log aggregation.
///                   If false, uses pretty-printed human-readable format.
///
/// # Defaults
///
/// When no configuration is provided:
/// - Level: `info` for eth_uniswap_v3_alloy, `warn` for dependencies
/// - Format: Pretty-printed with colors and timestamps
/// - Output: Console only (no file)
///
/// # Returns
///
/// When file logging is enabled, returns the non-blocking writer's guard.
/// The caller must keep it alive for the process lifetime, otherwise
/// buffered log lines are dropped on exit.
///
/// # Examples
///
/// ```no_run
/// use eth_uniswap_v3_alloy::observability;
/// use std::path::PathBuf;
///
/// // Development: pretty console output at debug level
/// let _guard = observability::init_tracing(
///     Some("debug".to_string()),
///     None,
///     false
/// )?;
/// # Ok::<(), eth_uniswap_v3_alloy::error::SwapError>(())
/// ```
///
/// # Log Levels
///
/// - `error`: Fatal errors requiring immediate attention
/// - `warn`: Issues that should be investigated but aren't fatal
/// - `info`: Important state changes and milestones (default)
/// - `debug`: Detailed debugging information
/// - `trace`: Very verbose, function entry/exit
///
/// # Errors
///
/// Returns an error if:
/// - File path is invalid or cannot be created
/// - Log initialization fails
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> SwapResult<Option<WorkerGuard>> {
    // Build environment filter from RUST_LOG or provided level
    let env_filter = if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        // Default: info for our app, warn for dependencies
        // This reduces noise from Alloy, hyper, and other libraries
        EnvFilter::new("eth_uniswap_v3_alloy=info,warn")
    };

    // Console layer (stdout)
    let console_layer = if json_output {
        // Production: JSON output for log aggregation (ELK, Datadog, etc.)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        // Development: Human-readable colored output
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    };

    // File layer (optional)
    let mut guard = None;
    let file_layer = if let Some(ref path) = log_file {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SwapError::config(
                    format!("Failed to create log directory '{}'", parent.display()),
                    Some(Box::new(e)),
                )
            })?;
        }

        // Create rolling file appender (rotates daily)
        let file_appender = tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_name().unwrap_or_else(|| OsStr::new("app.log")),
        );

        // Non-blocking writer for better performance
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        // File always uses JSON for structured log analysis
        Some(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        )
    } else {
        None
    };

    // Build subscriber with layers
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    // Add file layer if configured. try_init instead of init so a second
    // call (as happens across tests) reports an error instead of panicking.
    let installed = if let Some(file) = file_layer {
        subscriber.with(file).try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| {
        SwapError::config("Failed to install tracing subscriber", Some(Box::new(e)))
    })?;

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized successfully"
    );

    Ok(guard)
}

/// Initialize tracing with test-specific configuration.
///
/// This function sets up logging for unit and integration tests,
/// with output directed to the test harness.
///
/// Use this in test modules to see logging output with `cargo test -- --nocapture`.
///
/// # Example
///
/// ```no_run
/// #[cfg(test)]
/// mod tests {
///     use super::*;
///
///     fn init_test_logging() {
///         let _ = eth_uniswap_v3_alloy::observability::init_test_tracing();
///     }
///
///     #[tokio::test]
///     async fn test_with_logging() {
///         init_test_logging();
///
///         // Test code with tracing output...
///     }
/// }
/// ```
#[cfg(test)]
pub fn init_test_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .with_span_events(FmtSpan::CLOSE)
        .pretty()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_default() {
        // Test that default initialization doesn't panic
        // Note: Can only initialize once per process, so this may fail if run after others
        let result = init_tracing(None, None, false);
        // Don't assert success because tracing may already be initialized
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_init_tracing_with_level() {
        let result = init_tracing(Some("debug".to_string()), None, false);
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_init_tracing_json() {
        let result = init_tracing(Some("info".to_string()), None, true);
        assert!(result.is_ok() || result.is_err());
    }
}
