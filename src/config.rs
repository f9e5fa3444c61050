//! Configuration management for the swap toolkit.
//!
//! This module handles loading and validating configuration from environment variables
//! using the `dotenvy` crate. All operations return [`SwapResult`] for comprehensive
//! error handling.
//!
//! ## Environment Variables
//!
//! RPC endpoint (one of the two is required):
//! - `RPC_URL`: Full Ethereum RPC URL, used as-is
//! - `ALCHEMY_API_KEY`: Alchemy API key, expanded to the mainnet Alchemy URL
//!
//! Optional:
//! - `PRIVATE_KEY`: Hex-encoded key for commands that send transactions
//! - `SWAP_CONTRACT`: Address of the deployed swap wrapper contract
//! - `POLL_INTERVAL_SECS`: Receipt polling interval (default: 5)
//! - `POLL_TIMEOUT_SECS`: Receipt polling timeout (default: 300)
//! - `LOG_LEVEL`: Logging level override (e.g. "debug")
//! - `LOG_FILE`: Path for rotating file logs
//! - `LOG_JSON`: Emit JSON logs on the console (default: false)
//! - `RUST_LOG`: Standard tracing filter, takes precedence over `LOG_LEVEL`
//!
//! ## Example
//!
//! ```no_run
//! use eth_uniswap_v3_alloy::config::Config;
//! use eth_uniswap_v3_alloy::error::SwapResult;
//!
//! # fn main() -> SwapResult<()> {
//! let config = Config::from_env()?;
//! println!("RPC URL: {}", config.rpc_url());
//! # Ok(())
//! # }
//! ```

use crate::error::{SwapError, SwapResult};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct for the toolkit.
///
/// Contains all runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum RPC URL, either given directly or constructed from an
    /// Alchemy API key
    rpc_url: String,

    /// Hex-encoded private key for transaction-sending commands
    private_key: Option<String>,

    /// Address of the deployed swap wrapper contract
    swap_contract: Option<String>,

    /// Receipt polling interval in seconds
    poll_interval_secs: u64,

    /// Receipt polling timeout in seconds
    poll_timeout_secs: u64,

    /// Log level override
    log_level: Option<String>,

    /// Path for rotating file logs
    log_file: Option<PathBuf>,

    /// Emit JSON logs on the console
    log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This function:
    /// 1. Loads `.env` file using `dotenvy` (if present)
    /// 2. Reads and validates all environment variables
    /// 3. Applies defaults for optional variables
    /// 4. Resolves the RPC URL, preferring `RPC_URL` over `ALCHEMY_API_KEY`
    ///
    /// The private key is stored verbatim; it is validated when a signer
    /// is actually built, so read-only commands work without one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither `RPC_URL` nor `ALCHEMY_API_KEY` is set
    /// - Environment variable values are invalid (e.g., non-numeric for numbers)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use eth_uniswap_v3_alloy::config::Config;
    /// use eth_uniswap_v3_alloy::error::SwapResult;
    ///
    /// # fn main() -> SwapResult<()> {
    /// let config = Config::from_env()?;
    /// println!("Configuration loaded successfully");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> SwapResult<Self> {
        // Load .env file if present (ignore error if file doesn't exist)
        dotenvy::dotenv().ok();

        // RPC endpoint: a full URL wins, otherwise build one from the
        // Alchemy API key
        let rpc_url = match env::var("RPC_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                let alchemy_api_key = env::var("ALCHEMY_API_KEY").map_err(|e| {
                    SwapError::config(
                        "Either RPC_URL or ALCHEMY_API_KEY environment variable is required",
                        Some(Box::new(e)),
                    )
                })?;

                if alchemy_api_key.is_empty() || alchemy_api_key == "your_alchemy_api_key_here" {
                    return Err(SwapError::config(
                        "ALCHEMY_API_KEY must be set to a valid Alchemy API key",
                        None,
                    ));
                }

                format!("https://eth-mainnet.g.alchemy.com/v2/{alchemy_api_key}")
            }
        };

        // Optional: private key for write commands. Kept verbatim here;
        // rpc::parse_signer validates it when a wallet is needed.
        let private_key = env::var("PRIVATE_KEY").ok().filter(|key| !key.is_empty());

        // Optional: swap wrapper address, validated when the swap command
        // builds its network profile
        let swap_contract = env::var("SWAP_CONTRACT").ok().filter(|addr| !addr.is_empty());

        // Optional: Receipt poll interval (default: 5 seconds)
        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|e| {
                SwapError::config(
                    "POLL_INTERVAL_SECS must be a valid number",
                    Some(Box::new(e)),
                )
            })?;

        // Optional: Receipt poll timeout (default: 300 seconds)
        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u64>()
            .map_err(|e| {
                SwapError::config(
                    "POLL_TIMEOUT_SECS must be a valid number",
                    Some(Box::new(e)),
                )
            })?;

        // Optional: logging knobs, consumed by observability::init_tracing
        let log_level = env::var("LOG_LEVEL").ok().filter(|level| !level.is_empty());
        let log_file = env::var("LOG_FILE")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let log_json = env::var("LOG_JSON")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|e| {
                SwapError::config("LOG_JSON must be 'true' or 'false'", Some(Box::new(e)))
            })?;

        Ok(Self {
            rpc_url,
            private_key,
            swap_contract,
            poll_interval_secs,
            poll_timeout_secs,
            log_level,
            log_file,
            log_json,
        })
    }

    /// Get the Ethereum RPC URL.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Get the private key, if one was configured.
    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    /// Get the swap wrapper contract address, if one was configured.
    #[must_use]
    pub fn swap_contract(&self) -> Option<&str> {
        self.swap_contract.as_deref()
    }

    /// Get the receipt polling interval in seconds.
    #[must_use]
    pub const fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs
    }

    /// Get the receipt polling timeout in seconds.
    #[must_use]
    pub const fn poll_timeout_secs(&self) -> u64 {
        self.poll_timeout_secs
    }

    /// Get the receipt polling interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get the receipt polling timeout as a [`Duration`].
    #[must_use]
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Get the log level override, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    /// Get the log file path, if file logging is enabled.
    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Check whether console logs should be JSON.
    #[must_use]
    pub const fn log_json(&self) -> bool {
        self.log_json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, PoisonError};

    // from_env reads process-global environment variables, so tests that
    // touch them must not run concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONFIG_VARS: &[&str] = &[
        "RPC_URL",
        "ALCHEMY_API_KEY",
        "PRIVATE_KEY",
        "SWAP_CONTRACT",
        "POLL_INTERVAL_SECS",
        "POLL_TIMEOUT_SECS",
        "LOG_LEVEL",
        "LOG_FILE",
        "LOG_JSON",
    ];

    fn clear_env() {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_requires_rpc_source() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        let result = Config::from_env();
        assert!(matches!(result, Err(SwapError::ConfigError { .. })));
    }

    #[test]
    fn test_config_prefers_explicit_rpc_url() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("RPC_URL", "http://localhost:8545");

        let config = Config::from_env();
        assert!(config.is_ok());

        if let Ok(config) = config {
            assert_eq!(config.rpc_url(), "http://localhost:8545");
            assert!(config.private_key().is_none());
            assert_eq!(config.poll_interval_secs(), 5);
            assert_eq!(config.poll_timeout_secs(), 300);
            assert!(!config.log_json());
        }

        clear_env();
    }

    #[test]
    fn test_config_rpc_url_construction() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("ALCHEMY_API_KEY", "test_api_key");

        let config = Config::from_env();
        assert!(config.is_ok());

        if let Ok(config) = config {
            assert_eq!(
                config.rpc_url(),
                "https://eth-mainnet.g.alchemy.com/v2/test_api_key"
            );
        }

        clear_env();
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("ALCHEMY_API_KEY", "");

        let result = Config::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    fn test_config_validation_placeholder_api_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("ALCHEMY_API_KEY", "your_alchemy_api_key_here");

        let result = Config::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    fn test_config_invalid_poll_interval() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("RPC_URL", "http://localhost:8545");
        env::set_var("POLL_INTERVAL_SECS", "not-a-number");

        let result = Config::from_env();
        assert!(matches!(result, Err(SwapError::ConfigError { .. })));

        clear_env();
    }

    #[test]
    fn test_config_reads_wallet_and_logging() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();

        env::set_var("RPC_URL", "http://localhost:8545");
        env::set_var("PRIVATE_KEY", "abc123");
        env::set_var("SWAP_CONTRACT", "0x1aa862951c58aEc5f2745F63575d91BaCCF8fc41");
        env::set_var("POLL_INTERVAL_SECS", "2");
        env::set_var("POLL_TIMEOUT_SECS", "60");
        env::set_var("LOG_LEVEL", "debug");
        env::set_var("LOG_FILE", "./logs/test.log");
        env::set_var("LOG_JSON", "true");

        let config = Config::from_env();
        assert!(config.is_ok());

        if let Ok(config) = config {
            assert_eq!(config.private_key(), Some("abc123"));
            assert_eq!(
                config.swap_contract(),
                Some("0x1aa862951c58aEc5f2745F63575d91BaCCF8fc41")
            );
            assert_eq!(config.poll_interval(), Duration::from_secs(2));
            assert_eq!(config.poll_timeout(), Duration::from_secs(60));
            assert_eq!(config.log_level(), Some("debug"));
            assert_eq!(config.log_file(), Some(Path::new("./logs/test.log")));
            assert!(config.log_json());
        }

        clear_env();
    }
}
