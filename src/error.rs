//! Error types for the Uniswap V3 swap toolkit.
//!
//! This module provides a unified error type [`SwapError`] that encompasses
//! all possible errors that can occur during pool derivation, price
//! conversion, and on-chain orchestration.
//!
//! # Design
//!
//! The error hierarchy is organized by layer:
//! - [`SwapError::InvalidInput`]: Out-of-domain arguments (equal tokens, negative prices)
//! - [`SwapError::DivisionByZero`]: Reciprocal requested on a zero ratio
//! - [`SwapError::ConfigError`]: Configuration and environment issues
//! - [`SwapError::RpcError`]: RPC provider and network errors
//! - [`SwapError::ContractError`]: Contract call and decoding errors
//! - [`SwapError::TxError`]: Transaction submission, revert, and inclusion errors
//!
//! All errors implement [`std::error::Error`] and include rich context via
//! the source error chain. Every fallible path in the crate returns
//! [`SwapResult`]; nothing panics on a failed call.
//!
//! # Example
//!
//! ```
//! use eth_uniswap_v3_alloy::error::{SwapError, SwapResult};
//!
//! fn validate_amount(amount: f64) -> SwapResult<()> {
//!     if amount <= 0.0 {
//!         return Err(SwapError::invalid_input(
//!             "swap amount must be positive",
//!             None
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Result type alias using [`SwapError`].
pub type SwapResult<T> = Result<T, SwapError>;

/// Unified error type for the Uniswap V3 swap toolkit.
///
/// This enum encompasses all error types that can occur during:
/// - Pool key canonicalization and address derivation
/// - Price encoding and decoding
/// - Configuration loading
/// - RPC provider operations
/// - Contract calls and transaction submission
#[derive(Debug)]
pub enum SwapError {
    /// Malformed or out-of-domain arguments.
    ///
    /// Variants include:
    /// - The same token supplied for both sides of a pair
    /// - Negative or non-finite prices
    /// - Unparseable addresses, keys, or amounts
    InvalidInput {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A reciprocal was requested on a zero ratio.
    ///
    /// Occurs when a pool reports a zero `sqrtPriceX96` and the caller
    /// asked for the price in the inverted direction.
    DivisionByZero {
        /// Human-readable error message
        message: String,
    },

    /// Configuration or environment variable errors.
    ///
    /// Variants include:
    /// - Missing or invalid environment variables
    /// - Invalid addresses or URLs
    /// - Malformed configuration values
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// RPC provider or network errors.
    ///
    /// Variants include:
    /// - Failed to connect to provider
    /// - Network timeout
    /// - RPC method errors
    RpcError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Contract call or decoding errors.
    ///
    /// Variants include:
    /// - Reverted `eth_call` reads
    /// - Return data that does not decode
    /// - Missing contract code at the target address
    ContractError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transaction submission or inclusion errors.
    ///
    /// Variants include:
    /// - Rejected or underpriced submissions
    /// - Transactions that reverted on-chain
    /// - Inclusion polling that exceeded its timeout
    TxError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SwapError {
    /// Create a new invalid-input error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::invalid_input("tokens must differ", None);
    /// assert!(matches!(err, SwapError::InvalidInput { .. }));
    /// ```
    #[must_use]
    pub fn invalid_input(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source,
        }
    }

    /// Create a new division-by-zero error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::division_by_zero("cannot invert a zero price");
    /// assert!(matches!(err, SwapError::DivisionByZero { .. }));
    /// ```
    #[must_use]
    pub fn division_by_zero(message: impl Into<String>) -> Self {
        Self::DivisionByZero {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::config("ALCHEMY_API_KEY not set", None);
    /// assert!(matches!(err, SwapError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new RPC error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::rpc("Failed to connect to provider", None);
    /// assert!(matches!(err, SwapError::RpcError { .. }));
    /// ```
    #[must_use]
    pub fn rpc(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::RpcError {
            message: message.into(),
            source,
        }
    }

    /// Create a new contract error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::contract("decimals() call reverted", None);
    /// assert!(matches!(err, SwapError::ContractError { .. }));
    /// ```
    #[must_use]
    pub fn contract(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ContractError {
            message: message.into(),
            source,
        }
    }

    /// Create a new transaction error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_uniswap_v3_alloy::error::SwapError;
    ///
    /// let err = SwapError::tx("swap transaction reverted", None);
    /// assert!(matches!(err, SwapError::TxError { .. }));
    /// ```
    #[must_use]
    pub fn tx(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::TxError {
            message: message.into(),
            source,
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message, .. } => write!(f, "Invalid input: {message}"),
            Self::DivisionByZero { message } => write!(f, "Division by zero: {message}"),
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::RpcError { message, .. } => write!(f, "RPC error: {message}"),
            Self::ContractError { message, .. } => write!(f, "Contract error: {message}"),
            Self::TxError { message, .. } => write!(f, "Transaction error: {message}"),
        }
    }
}

impl std::error::Error for SwapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput { source, .. }
            | Self::ConfigError { source, .. }
            | Self::RpcError { source, .. }
            | Self::ContractError { source, .. }
            | Self::TxError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
            Self::DivisionByZero { .. } => None,
        }
    }
}

/// Convert from `eyre::Report` to `SwapError`.
///
/// This is primarily used for wrapping eyre errors that don't fit into
/// a specific category. The error is categorized as an RPC error by default.
impl From<eyre::Report> for SwapError {
    fn from(err: eyre::Report) -> Self {
        Self::RpcError {
            message: err.to_string(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_input_error() {
        let err = SwapError::invalid_input("tokens must differ", None);
        assert!(matches!(err, SwapError::InvalidInput { .. }));
        assert_eq!(err.to_string(), "Invalid input: tokens must differ");
    }

    #[test]
    fn test_division_by_zero_error() {
        let err = SwapError::division_by_zero("zero sqrt price");
        assert!(matches!(err, SwapError::DivisionByZero { .. }));
        assert_eq!(err.to_string(), "Division by zero: zero sqrt price");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_config_error() {
        let err = SwapError::config("test error", None);
        assert!(matches!(err, SwapError::ConfigError { .. }));
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_rpc_error() {
        let err = SwapError::rpc("connection failed", None);
        assert!(matches!(err, SwapError::RpcError { .. }));
        assert_eq!(err.to_string(), "RPC error: connection failed");
    }

    #[test]
    fn test_contract_error() {
        let err = SwapError::contract("bad return data", None);
        assert!(matches!(err, SwapError::ContractError { .. }));
        assert_eq!(err.to_string(), "Contract error: bad return data");
    }

    #[test]
    fn test_tx_error() {
        let err = SwapError::tx("reverted", None);
        assert!(matches!(err, SwapError::TxError { .. }));
        assert_eq!(err.to_string(), "Transaction error: reverted");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SwapError::config("failed to load", Some(Box::new(source)));

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Configuration error: failed to load");
    }

    #[test]
    fn test_error_trait() {
        let err = SwapError::rpc("test", None);
        // Ensure it implements Error trait
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_from_eyre_report() {
        let report = eyre::eyre!("upstream failure");
        let err = SwapError::from(report);
        assert!(matches!(err, SwapError::RpcError { .. }));
    }
}
