//! RPC provider management for Ethereum connections.
//!
//! This module handles connection to Ethereum nodes via RPC (Alchemy).
//! Read-only commands use a plain HTTP [`Provider`]; commands that submit
//! transactions build a wallet-backed provider whose fillers supply gas,
//! nonce, and chain id, signing locally with a private key.
//!
//! ## Example
//!
//! ```no_run
//! use eth_uniswap_v3_alloy::rpc::{create_provider, get_latest_block};
//! use eth_uniswap_v3_alloy::error::SwapResult;
//!
//! # async fn example() -> SwapResult<()> {
//! let provider = create_provider("https://eth-mainnet.g.alchemy.com/v2/API_KEY").await?;
//! let latest_block = get_latest_block(&provider).await?;
//! println!("Latest block: {latest_block}");
//! # Ok(())
//! # }
//! ```

use crate::error::{SwapError, SwapResult};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider as AlloProvider, ProviderBuilder, RootProvider};
use alloy::rpc::types::TransactionReceipt;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Type alias for the read-only HTTP provider.
///
/// This provider can serve `eth_call` and state queries but holds no
/// signer. Use [`create_wallet_provider`] for anything that sends a
/// transaction.
pub type Provider = RootProvider<Http<Client>>;

/// Create a new Ethereum RPC provider connected via HTTP.
///
/// This function establishes a connection to an Ethereum node using the provided
/// RPC URL (typically an Alchemy endpoint).
///
/// # Arguments
///
/// * `rpc_url` - The HTTP(S) endpoint URL for the Ethereum RPC node
///
/// # Returns
///
/// A configured provider instance ready for making RPC calls.
///
/// # Errors
///
/// Returns an error if the RPC URL is invalid.
///
/// # Example
///
/// ```no_run
/// use eth_uniswap_v3_alloy::rpc::create_provider;
/// use eth_uniswap_v3_alloy::error::SwapResult;
///
/// # async fn example() -> SwapResult<()> {
/// let provider = create_provider("https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY").await?;
/// # Ok(())
/// # }
/// ```
#[allow(clippy::unused_async)]
pub async fn create_provider(rpc_url: &str) -> SwapResult<Provider> {
    info!("Initializing RPC provider");

    // Log only the host portion so API keys stay out of the logs
    let host = rpc_url.split("/v2/").next().unwrap_or("unknown");
    debug!("RPC host: {}", host);

    let url = rpc_url
        .parse()
        .map_err(|e| SwapError::rpc("Failed to parse RPC URL", Some(Box::new(e))))?;

    let provider = ProviderBuilder::new().on_http(url);

    info!("RPC provider initialized successfully");

    Ok(provider)
}

/// Parse a hex-encoded private key into a local signer.
///
/// Accepts the key with or without a `0x` prefix. The signer's address
/// is available via `signer.address()` before handing it to
/// [`create_wallet_provider`].
///
/// # Errors
///
/// Returns an error if the key is not 32 bytes of valid hex.
///
/// # Example
///
/// ```
/// use eth_uniswap_v3_alloy::rpc::parse_signer;
///
/// let signer = parse_signer(
///     "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
/// )
/// .unwrap();
/// assert_eq!(
///     signer.address().to_string(),
///     "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
/// );
/// ```
pub fn parse_signer(private_key: &str) -> SwapResult<PrivateKeySigner> {
    private_key.trim().parse::<PrivateKeySigner>().map_err(|e| {
        SwapError::config(
            "Failed to parse PRIVATE_KEY: expected 32 bytes of hex",
            Some(Box::new(e)),
        )
    })
}

/// Create a wallet-backed provider that signs with the given key.
///
/// The builder stacks the recommended fillers (gas estimation, nonce
/// management, chain ID resolution) on top of the wallet, so outgoing
/// transactions only need their calldata supplied.
///
/// # Arguments
///
/// * `rpc_url` - The HTTP(S) endpoint URL for the Ethereum RPC node
/// * `signer` - The local signer that will sign outgoing transactions
///
/// # Errors
///
/// Returns an error if the RPC URL is invalid.
///
/// # Example
///
/// ```no_run
/// use eth_uniswap_v3_alloy::rpc::{create_wallet_provider, parse_signer};
/// use eth_uniswap_v3_alloy::error::SwapResult;
///
/// # async fn example() -> SwapResult<()> {
/// let signer = parse_signer("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")?;
/// let provider = create_wallet_provider(
///     "https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY",
///     signer,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
#[allow(clippy::unused_async)]
pub async fn create_wallet_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> SwapResult<impl AlloProvider<Http<Client>> + Clone> {
    let sender = signer.address();

    let url = rpc_url
        .parse()
        .map_err(|e| SwapError::rpc("Failed to parse RPC URL", Some(Box::new(e))))?;

    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(url);

    info!("Wallet provider initialized for sender {}", sender);

    Ok(provider)
}

/// Get the latest block number from the Ethereum network.
///
/// # Arguments
///
/// * `provider` - Reference to the RPC provider instance
///
/// # Returns
///
/// The latest block number as a `u64`.
///
/// # Errors
///
/// Returns an error if the RPC request fails or the connection is lost.
///
/// # Example
///
/// ```no_run
/// use eth_uniswap_v3_alloy::rpc::{create_provider, get_latest_block};
/// use eth_uniswap_v3_alloy::error::SwapResult;
///
/// # async fn example() -> SwapResult<()> {
/// let provider = create_provider("https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY").await?;
/// let block_number = get_latest_block(&provider).await?;
/// println!("Current block: {block_number}");
/// # Ok(())
/// # }
/// ```
pub async fn get_latest_block(provider: &Provider) -> SwapResult<u64> {
    debug!("Fetching latest block number");

    let block_number = provider
        .get_block_number()
        .await
        .map_err(|e| SwapError::rpc("Failed to fetch latest block number", Some(Box::new(e))))?;

    info!("Latest block number: {}", block_number);

    Ok(block_number)
}

/// Check if the provider connection is healthy by fetching the latest block.
///
/// # Errors
///
/// Returns an error if the RPC connection is not working.
pub async fn check_connection(provider: &Provider) -> SwapResult<()> {
    debug!("Checking provider connection health");

    match get_latest_block(provider).await {
        Ok(block) => {
            info!("Connection check successful - latest block: {}", block);
            Ok(())
        }
        Err(e) => {
            warn!("Connection check failed: {}", e);
            Err(SwapError::rpc(
                format!("Provider connection health check failed: {e}"),
                None,
            ))
        }
    }
}

/// Get the native ETH balance of an address, in wei.
///
/// # Arguments
///
/// * `provider` - Reference to the RPC provider instance
/// * `address` - The account to query
///
/// # Errors
///
/// Returns an error if the RPC request fails.
pub async fn get_eth_balance(provider: &Provider, address: Address) -> SwapResult<U256> {
    debug!("Fetching ETH balance of {}", address);

    let balance = provider.get_balance(address).await.map_err(|e| {
        SwapError::rpc(
            format!("Failed to fetch ETH balance of {address}"),
            Some(Box::new(e)),
        )
    })?;

    info!("ETH balance of {}: {} wei", address, balance);

    Ok(balance)
}

/// Poll until a transaction is mined, or the timeout elapses.
///
/// The receipt is re-fetched on `poll_interval` with ±25% jitter so that
/// many waiters sharing one endpoint spread out. Transient RPC failures
/// are retried rather than surfaced; only the timeout ends the wait
/// early.
///
/// # Arguments
///
/// * `provider` - Reference to the RPC provider instance
/// * `tx_hash` - Hash of the submitted transaction
/// * `poll_interval` - Base delay between receipt queries
/// * `timeout` - Total time to wait before giving up
///
/// # Errors
///
/// Returns [`SwapError::TxError`] if the transaction is still unmined
/// when `timeout` elapses.
pub async fn wait_for_receipt(
    provider: &Provider,
    tx_hash: TxHash,
    poll_interval: Duration,
    timeout: Duration,
) -> SwapResult<TransactionReceipt> {
    let deadline = Instant::now() + timeout;
    let mut attempt: u32 = 0;

    loop {
        match provider.get_transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) if receipt.block_number.is_some() => {
                info!(
                    tx_hash = %tx_hash,
                    block = receipt.block_number.unwrap_or_default(),
                    attempts = attempt + 1,
                    "Transaction mined"
                );
                return Ok(receipt);
            }
            Ok(_) => {
                debug!(tx_hash = %tx_hash, attempt, "Transaction not yet mined");
            }
            Err(e) => {
                warn!(error = %e, attempt, "Receipt poll failed, will retry");
            }
        }

        if Instant::now() >= deadline {
            return Err(SwapError::tx(
                format!(
                    "transaction {tx_hash} not mined within {}s",
                    timeout.as_secs()
                ),
                None,
            ));
        }

        attempt += 1;

        // Add jitter (±25%) to prevent thundering herd
        let jitter_factor = 0.25 * (rand::random::<f64>() - 0.5);
        let jitter_ms = (poll_interval.as_millis() as f64 * jitter_factor).round() as i64;
        let delay = if jitter_ms >= 0 {
            poll_interval + Duration::from_millis(jitter_ms as u64)
        } else {
            poll_interval - Duration::from_millis((-jitter_ms) as u64)
        };

        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANVIL_DEV_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_signer_valid() {
        let signer = parse_signer(ANVIL_DEV_KEY);
        assert!(signer.is_ok());

        if let Ok(signer) = signer {
            assert_eq!(
                signer.address().to_string(),
                "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            );
        }
    }

    #[test]
    fn test_parse_signer_accepts_prefix() {
        let bare = parse_signer(ANVIL_DEV_KEY);
        let prefixed = parse_signer(&format!("0x{ANVIL_DEV_KEY}"));
        assert!(bare.is_ok());
        assert!(prefixed.is_ok());

        if let (Ok(bare), Ok(prefixed)) = (bare, prefixed) {
            assert_eq!(bare.address(), prefixed.address());
        }
    }

    #[test]
    fn test_parse_signer_invalid() {
        let result = parse_signer("not-a-key");
        assert!(matches!(result, Err(SwapError::ConfigError { .. })));
    }

    #[test]
    fn test_create_provider_invalid_url() {
        if let Ok(rt) = tokio::runtime::Runtime::new() {
            rt.block_on(async {
                let result = create_provider("not-a-valid-url").await;
                assert!(result.is_err());
            });
        }
    }

    #[tokio::test]
    async fn test_wait_for_receipt_times_out() {
        // Nothing listens on port 1, so every poll fails until the
        // deadline passes.
        let Ok(provider) = create_provider("http://127.0.0.1:1").await else {
            return;
        };

        let result = wait_for_receipt(
            &provider,
            TxHash::ZERO,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .await;

        assert!(matches!(result, Err(SwapError::TxError { .. })));
    }

    #[tokio::test]
    #[ignore = "Requires valid RPC_URL environment variable"]
    async fn test_create_provider_integration() {
        let rpc_url = std::env::var("ALCHEMY_API_KEY").map_or_else(
            |_| "http://localhost:8545".to_string(),
            |key| format!("https://eth-mainnet.g.alchemy.com/v2/{key}"),
        );

        let result = create_provider(&rpc_url).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore = "Requires valid RPC_URL environment variable"]
    async fn test_get_latest_block_integration() {
        let rpc_url = std::env::var("ALCHEMY_API_KEY").map_or_else(
            |_| "http://localhost:8545".to_string(),
            |key| format!("https://eth-mainnet.g.alchemy.com/v2/{key}"),
        );

        let provider = create_provider(&rpc_url).await;
        assert!(provider.is_ok());

        if let Ok(provider) = provider {
            let block_number = get_latest_block(&provider).await;
            assert!(block_number.is_ok());

            if let Ok(block) = block_number {
                assert!(block > 0);
            }
        }
    }

    #[tokio::test]
    #[ignore = "Requires valid RPC_URL environment variable"]
    async fn test_check_connection_integration() {
        let rpc_url = std::env::var("ALCHEMY_API_KEY").map_or_else(
            |_| "http://localhost:8545".to_string(),
            |key| format!("https://eth-mainnet.g.alchemy.com/v2/{key}"),
        );

        if let Ok(provider) = create_provider(&rpc_url).await {
            let result = check_connection(&provider).await;
            assert!(result.is_ok());
        }
    }
}
