//! ERC20 token interactions: metadata, balances, allowances, approvals.
//!
//! Bindings are generated at compile time with Alloy's `sol!` macro, so
//! every call site is typed against the Solidity signature instead of a
//! runtime ABI file. The module covers exactly the surface a swap needs:
//! `name`, `symbol`, `decimals`, `balanceOf`, `allowance`, and
//! `approve`, plus the allowance gate that decides whether an approval
//! transaction must be sent before swapping.
//!
//! ## Example
//!
//! ```no_run
//! use eth_uniswap_v3_alloy::erc20::fetch_token_info;
//! use eth_uniswap_v3_alloy::network::USDC_ADDRESS;
//! use eth_uniswap_v3_alloy::rpc::create_provider;
//!
//! # async fn example() -> eth_uniswap_v3_alloy::error::SwapResult<()> {
//! let provider = create_provider("https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY").await?;
//! let info = fetch_token_info(&provider, USDC_ADDRESS).await?;
//! println!("{} has {} decimals", info.name, info.decimals);
//! # Ok(())
//! # }
//! ```

use crate::error::{SwapError, SwapResult};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use alloy::sol;
use alloy::transports::http::{Client, Http};
use futures_util::future::try_join;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

sol! {
    /// Minimal ERC20 interface.
    ///
    /// Only the functions this crate actually calls: metadata for price
    /// display, plus the balance/allowance/approve triple that gates a
    /// swap.
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the token's human-readable name.
        function name() external view returns (string);

        /// Returns the token's ticker symbol.
        function symbol() external view returns (string);

        /// Returns the number of decimals the token reports.
        function decimals() external view returns (uint8);

        /// Returns the token balance of the given account.
        function balanceOf(address account) external view returns (uint256);

        /// Returns the remaining amount `spender` may transfer from `owner`.
        function allowance(address owner, address spender) external view returns (uint256);

        /// Sets `spender`'s allowance over the caller's tokens.
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Metadata snapshot of an ERC20 token.
///
/// Fetched once per command and threaded through price conversion and
/// display; the decimal count feeds the price codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    /// Token contract address.
    pub address: Address,
    /// Token name as reported by the contract.
    pub name: String,
    /// Ticker symbol as reported by the contract.
    pub symbol: String,
    /// Decimal count as reported by the contract.
    pub decimals: u8,
}

/// Fetch a token's name and decimals.
///
/// # Errors
///
/// Returns [`SwapError::ContractError`] if either call reverts or the
/// return data does not decode, which is the usual symptom of pointing at
/// an address that is not an ERC20 contract.
#[instrument(skip(provider))]
pub async fn fetch_token_info<P>(provider: &P, token: Address) -> SwapResult<TokenInfo>
where
    P: Provider<Http<Client>> + Clone,
{
    debug!("Fetching ERC20 metadata");
    let contract = IERC20::new(token, provider.clone());

    let name = contract
        .name()
        .call()
        .await
        .map_err(|e| {
            SwapError::contract(format!("name() call failed for {token}"), Some(Box::new(e)))
        })?
        ._0;

    let symbol = contract
        .symbol()
        .call()
        .await
        .map_err(|e| {
            SwapError::contract(
                format!("symbol() call failed for {token}"),
                Some(Box::new(e)),
            )
        })?
        ._0;

    let decimals = contract
        .decimals()
        .call()
        .await
        .map_err(|e| {
            SwapError::contract(
                format!("decimals() call failed for {token}"),
                Some(Box::new(e)),
            )
        })?
        ._0;

    info!(name = %name, symbol = %symbol, decimals, "Token metadata fetched");

    Ok(TokenInfo {
        address: token,
        name,
        symbol,
        decimals,
    })
}

/// Fetch metadata for both tokens of a pair concurrently.
///
/// # Errors
///
/// Returns the first [`SwapError::ContractError`] either fetch produces.
pub async fn fetch_pair_info<P>(
    provider: &P,
    token_a: Address,
    token_b: Address,
) -> SwapResult<(TokenInfo, TokenInfo)>
where
    P: Provider<Http<Client>> + Clone,
{
    try_join(
        fetch_token_info(provider, token_a),
        fetch_token_info(provider, token_b),
    )
    .await
}

/// Fetch the token balance of `owner`.
///
/// # Errors
///
/// Returns [`SwapError::ContractError`] if the call fails.
#[instrument(skip(provider))]
pub async fn fetch_balance<P>(provider: &P, token: Address, owner: Address) -> SwapResult<U256>
where
    P: Provider<Http<Client>> + Clone,
{
    let contract = IERC20::new(token, provider.clone());
    let balance = contract
        .balanceOf(owner)
        .call()
        .await
        .map_err(|e| {
            SwapError::contract(
                format!("balanceOf() call failed for {token}"),
                Some(Box::new(e)),
            )
        })?
        ._0;

    debug!(%balance, "Balance fetched");
    Ok(balance)
}

/// Fetch the amount `spender` is still allowed to transfer from `owner`.
///
/// # Errors
///
/// Returns [`SwapError::ContractError`] if the call fails.
#[instrument(skip(provider))]
pub async fn fetch_allowance<P>(
    provider: &P,
    token: Address,
    owner: Address,
    spender: Address,
) -> SwapResult<U256>
where
    P: Provider<Http<Client>> + Clone,
{
    let contract = IERC20::new(token, provider.clone());
    let allowance = contract
        .allowance(owner, spender)
        .call()
        .await
        .map_err(|e| {
            SwapError::contract(
                format!("allowance() call failed for {token}"),
                Some(Box::new(e)),
            )
        })?
        ._0;

    debug!(%allowance, "Allowance fetched");
    Ok(allowance)
}

/// Submit an `approve` transaction and return its hash without waiting
/// for inclusion.
///
/// The provider must carry a wallet; read-only providers cannot sign.
///
/// # Errors
///
/// Returns [`SwapError::TxError`] if the transaction is rejected at
/// submission time.
#[instrument(skip(provider))]
pub async fn send_approve<P>(
    provider: &P,
    token: Address,
    spender: Address,
    amount: U256,
) -> SwapResult<TxHash>
where
    P: Provider<Http<Client>> + Clone,
{
    let contract = IERC20::new(token, provider.clone());
    let pending = contract
        .approve(spender, amount)
        .send()
        .await
        .map_err(|e| {
            SwapError::tx(
                format!("approve() submission failed for {token}"),
                Some(Box::new(e)),
            )
        })?;

    let hash = *pending.tx_hash();
    info!(tx = %hash, "Approve transaction submitted");
    Ok(hash)
}

/// Approve `spender` for `required` tokens if the current allowance is
/// short, waiting for the approval to be mined.
///
/// Returns the approval transaction hash, or `None` when the existing
/// allowance already covers `required` and nothing was sent.
///
/// # Errors
///
/// Returns [`SwapError::ContractError`] if the allowance read fails, and
/// [`SwapError::TxError`] if the approval is rejected, reverts, or is not
/// mined within `poll_timeout`.
pub async fn ensure_allowance<P>(
    provider: &P,
    token: Address,
    owner: Address,
    spender: Address,
    required: U256,
    poll_interval: Duration,
    poll_timeout: Duration,
) -> SwapResult<Option<TxHash>>
where
    P: Provider<Http<Client>> + Clone,
{
    let current = fetch_allowance(provider, token, owner, spender).await?;
    if !needs_approval(current, required) {
        debug!(%current, %required, "Allowance already sufficient");
        return Ok(None);
    }

    info!(%current, %required, "Allowance short, sending approve");
    let hash = send_approve(provider, token, spender, required).await?;

    info!(tx = %hash, "Waiting for approval to be mined");
    let receipt = crate::rpc::wait_for_receipt(provider.root(), hash, poll_interval, poll_timeout)
        .await?;

    if !receipt.status() {
        return Err(SwapError::tx(
            format!("approve transaction {hash} reverted"),
            None,
        ));
    }

    Ok(Some(hash))
}

/// Whether an approval must be sent before `required` can be spent.
fn needs_approval(allowance: U256, required: U256) -> bool {
    allowance < required
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_needs_approval_when_short() {
        assert!(needs_approval(U256::ZERO, U256::from(1u8)));
        assert!(needs_approval(U256::from(99u8), U256::from(100u8)));
    }

    #[test]
    fn test_no_approval_when_covered() {
        assert!(!needs_approval(U256::from(100u8), U256::from(100u8)));
        assert!(!needs_approval(U256::from(101u8), U256::from(100u8)));
        assert!(!needs_approval(U256::MAX, U256::from(1u8)));
    }

    #[test]
    fn test_token_info_serializes() {
        let info = TokenInfo {
            address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            name: "Wrapped Ether".to_string(),
            symbol: "WETH".to_string(),
            decimals: 18,
        };

        let value = serde_json::to_value(&info).unwrap_or_default();
        assert_eq!(value["name"], "Wrapped Ether");
        assert_eq!(value["symbol"], "WETH");
        assert_eq!(value["decimals"], 18);
    }
}
