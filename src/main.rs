//! CLI entry point for the Uniswap V3 swap toolkit.
//!
//! # Architecture Flow
//!
//! This binary delegates to the CLI module, which orchestrates all layers:
//!
//! ```text
//! main.rs (Runtime Initialization)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)    → Load environment variables
//! 2. RPC Layer (src/rpc.rs)          → Create Ethereum provider
//! 3. Pool Layer (src/pool.rs)        → Derive pool addresses (CREATE2)
//! 4. ERC-20 Layer (src/erc20.rs)     → Token metadata & allowances
//! 5. Uniswap Layer (src/uniswap.rs)  → Pool state & swap execution
//! 6. Price Layer (src/price.rs)      → sqrtPriceX96 ↔ decimal price
//! 7. CLI Layer (output)              → Display formatted results
//! ```
//!
//! # Layer Separation
//!
//! - **main.rs**: Async runtime + tracing initialization only
//! - **CLI module**: User interface + layer orchestration
//! - **Core modules**: Independent, reusable, no upward dependencies
//!
//! All errors bubble up with context via `SwapResult<T>`.

use eth_uniswap_v3_alloy::{cli, observability};
use tracing::error;

/// Entry point for the Uniswap V3 swap toolkit.
///
/// Initializes:
/// - Tokio async runtime (via `#[tokio::main]`)
/// - Production-grade structured logging with tracing
/// - Environment-based filtering (RUST_LOG, LOG_JSON, LOG_FILE)
///
/// Then delegates to the CLI module for all business logic.
#[tokio::main]
async fn main() {
    // Load .env before reading the logging knobs so LOG_* values stored
    // there take effect. Config::from_env loads it again later, which is
    // harmless.
    dotenvy::dotenv().ok();

    // Initialize structured logging FIRST (before any other operations)
    // Configuration can be controlled via environment variables:
    // - RUST_LOG: Set log level (e.g., "debug", "info", "trace")
    // - LOG_JSON: Enable JSON output for production ("true" or "false")
    // - LOG_FILE: Write logs to file with daily rotation
    //
    // Examples:
    //   RUST_LOG=debug cargo run -- block
    //   RUST_LOG=eth_uniswap_v3_alloy=trace,hyper=warn cargo run -- price WETH USDC
    //   LOG_JSON=true LOG_FILE=./logs/swap.log cargo run -- swap WETH USDC -a 1000000
    let log_level = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let json_output = std::env::var("LOG_JSON")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    // The guard must live until exit so buffered file logs are flushed
    let _guard = match observability::init_tracing(log_level, log_file, json_output) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    // Run CLI - all layer orchestration happens inside cli::run()
    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
