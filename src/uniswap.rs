//! Uniswap V3 pool reads and swap execution.
//!
//! The pool interface covers the single read a spot quote needs:
//! `slot0`, whose first field is the current `sqrtPriceX96`. Swaps go
//! through a thin wrapper contract that exposes the raw pool `swap`
//! signature and settles the input token from the caller's approved
//! balance; its address is part of the [`NetworkProfile`].
//!
//! Swap direction and the default price limit both derive from the pool
//! key's canonicalization: selling the caller's input token means
//! `zeroForOne = !inverted`, and the default limit is the protocol's
//! sqrt-ratio bound for that direction, nudged one inside the open
//! interval the pool enforces.

use crate::error::{SwapError, SwapResult};
use crate::network::NetworkProfile;
use crate::pool::PoolKey;
use alloy::primitives::aliases::U160;
use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{Address, Sign, TxHash, I256, U256};
use alloy::providers::Provider;
use alloy::sol;
use alloy::transports::http::{Client, Http};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

sol! {
    /// Read surface of a Uniswap V3 pool.
    #[sol(rpc)]
    interface IUniswapV3Pool {
        /// Spot state packed into the pool's first storage slot.
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
    }

    /// Swap wrapper exposing the raw pool swap.
    ///
    /// The wrapper implements the pool's swap callback and pulls the
    /// owed input amount from the transaction sender, so the sender only
    /// needs an ERC20 approval for the wrapper.
    #[sol(rpc)]
    interface ISwapContract {
        /// Execute a swap against `pool`, sending output to `recipient`.
        function swap(
            address pool,
            address recipient,
            bool zeroForOne,
            int256 amountSpecified,
            uint160 sqrtPriceLimitX96
        ) external returns (int256 amount0, int256 amount1);
    }
}

/// Lowest sqrt price a pool can quote, exclusive.
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4_295_128_739, 0, 0, 0]);

/// Highest sqrt price a pool can quote, exclusive.
pub const MAX_SQRT_RATIO: U256 = U256::from_limbs([
    6_743_328_256_752_651_558,
    17_280_870_778_742_802_505,
    4_294_805_859,
    0,
]);

/// Spot state read from a pool's `slot0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot0 {
    /// Current sqrt price in Q64.96 encoding.
    pub sqrt_price_x96: U256,
    /// Current tick index.
    pub tick: i32,
}

/// Parameters for a single exact-input swap.
#[derive(Debug, Clone)]
pub struct SwapParams {
    /// Token the caller is selling.
    pub token_in: Address,
    /// Token the caller is buying.
    pub token_out: Address,
    /// Fee tier of the target pool.
    pub fee: u32,
    /// Exact amount of `token_in` to sell, in raw token units.
    pub amount_in: U256,
    /// Recipient of the output tokens.
    pub recipient: Address,
    /// Worst acceptable sqrt price; defaults to the direction's bound.
    pub sqrt_price_limit: Option<U256>,
}

/// Result of a mined swap transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    /// Hash of the swap transaction.
    pub tx_hash: TxHash,
    /// Block the swap was mined in.
    pub block_number: u64,
    /// Gas consumed by the swap.
    pub gas_used: u128,
}

/// Fetch a pool's current `slot0` state.
///
/// # Errors
///
/// Returns [`SwapError::ContractError`] if the call reverts or does not
/// decode, which usually means no pool is deployed at `pool`.
#[instrument(skip(provider))]
pub async fn fetch_slot0<P>(provider: &P, pool: Address) -> SwapResult<Slot0>
where
    P: Provider<Http<Client>> + Clone,
{
    let contract = IUniswapV3Pool::new(pool, provider.clone());
    let slot0 = contract.slot0().call().await.map_err(|e| {
        SwapError::contract(
            format!("slot0() call failed for pool {pool}"),
            Some(Box::new(e)),
        )
    })?;

    let state = Slot0 {
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: slot0.tick.as_i32(),
    };
    debug!(sqrt_price = %state.sqrt_price_x96, tick = state.tick, "Pool slot0 fetched");
    Ok(state)
}

/// Default sqrt price limit for a swap direction.
///
/// The pool rejects limits at or beyond the tick-math bounds, so the
/// default sits one inside: `MIN_SQRT_RATIO + 1` when selling token0,
/// `MAX_SQRT_RATIO - 1` when selling token1. These effectively disable
/// slippage protection; callers wanting a real bound pass their own
/// limit.
#[must_use]
pub fn default_sqrt_price_limit(zero_for_one: bool) -> U256 {
    if zero_for_one {
        MIN_SQRT_RATIO + U256::ONE
    } else {
        MAX_SQRT_RATIO - U256::ONE
    }
}

/// Execute an exact-input swap through the network's swap wrapper.
///
/// Derives the pool address from the token pair and fee, picks the swap
/// direction from the pair's canonicalization, submits the transaction,
/// and polls until it is mined.
///
/// The caller must already hold an ERC20 approval for the wrapper
/// covering `amount_in`; see [`crate::erc20::ensure_allowance`].
///
/// # Errors
///
/// Returns [`SwapError::ConfigError`] if the profile has no swap wrapper
/// configured, [`SwapError::InvalidInput`] for an unusable pair, amount,
/// or price limit, and [`SwapError::TxError`] if the transaction is
/// rejected, reverts, or is not mined within `poll_timeout`.
pub async fn execute_swap<P>(
    provider: &P,
    network: &NetworkProfile,
    params: &SwapParams,
    poll_interval: Duration,
    poll_timeout: Duration,
) -> SwapResult<SwapOutcome>
where
    P: Provider<Http<Client>> + Clone,
{
    let wrapper = network.swap_contract.ok_or_else(|| {
        SwapError::config(
            "network profile has no swap contract configured; set SWAP_CONTRACT",
            None,
        )
    })?;

    let key = PoolKey::new(params.token_in, params.token_out, params.fee)?;
    let pool = key.address(network);
    let zero_for_one = key.zero_for_one();

    let limit = params
        .sqrt_price_limit
        .unwrap_or_else(|| default_sqrt_price_limit(zero_for_one));
    if limit <= MIN_SQRT_RATIO || limit >= MAX_SQRT_RATIO {
        return Err(SwapError::invalid_input(
            format!("sqrt price limit {limit} is outside the pool's open interval"),
            None,
        ));
    }
    let limit = U160::uint_try_from(limit).map_err(|e| {
        SwapError::invalid_input("sqrt price limit exceeds 160 bits", Some(Box::new(e)))
    })?;

    let amount_specified = I256::checked_from_sign_and_abs(Sign::Positive, params.amount_in)
        .ok_or_else(|| {
            SwapError::invalid_input("swap amount exceeds the signed 256-bit range", None)
        })?;

    info!(
        %pool,
        zero_for_one,
        amount_in = %params.amount_in,
        recipient = %params.recipient,
        "Submitting swap"
    );

    let contract = ISwapContract::new(wrapper, provider.clone());
    let pending = contract
        .swap(
            pool,
            params.recipient,
            zero_for_one,
            amount_specified,
            limit,
        )
        .send()
        .await
        .map_err(|e| SwapError::tx("swap submission failed", Some(Box::new(e))))?;

    let hash = *pending.tx_hash();
    info!(tx = %hash, "Swap transaction submitted, waiting for inclusion");

    let receipt =
        crate::rpc::wait_for_receipt(provider.root(), hash, poll_interval, poll_timeout).await?;

    if !receipt.status() {
        return Err(SwapError::tx(
            format!("swap transaction {hash} reverted"),
            None,
        ));
    }

    let outcome = SwapOutcome {
        tx_hash: hash,
        block_number: receipt.block_number.unwrap_or_default(),
        gas_used: receipt.gas_used,
    };
    info!(
        tx = %outcome.tx_hash,
        block = outcome.block_number,
        gas = outcome.gas_used,
        "Swap mined"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_ratio_bounds_ordered() {
        assert!(MIN_SQRT_RATIO < MAX_SQRT_RATIO);
        assert_eq!(MIN_SQRT_RATIO, U256::from(4_295_128_739_u64));
    }

    #[test]
    fn test_default_limit_selling_token0() {
        let limit = default_sqrt_price_limit(true);
        assert_eq!(limit, U256::from(4_295_128_740_u64));
        assert!(limit > MIN_SQRT_RATIO);
        assert!(limit < MAX_SQRT_RATIO);
    }

    #[test]
    fn test_default_limit_selling_token1() {
        let limit = default_sqrt_price_limit(false);
        assert_eq!(limit, MAX_SQRT_RATIO - U256::ONE);
        assert!(limit > MIN_SQRT_RATIO);
        assert!(limit < MAX_SQRT_RATIO);
    }

    #[test]
    fn test_limits_fit_in_160_bits() {
        for limit in [default_sqrt_price_limit(true), default_sqrt_price_limit(false)] {
            assert!(U160::uint_try_from(limit).is_ok());
        }
    }
}
