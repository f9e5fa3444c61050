//! Pool key canonicalization and deterministic pool address derivation.
//!
//! Uniswap V3 deploys one pool per (token0, token1, fee) triple through
//! CREATE2, so a pool's address is a pure function of its key and the
//! network's factory constants. No registry lookup is needed: this module
//! recomputes addresses on demand.
//!
//! The pool convention orders the two tokens by raw byte comparison.
//! [`PoolKey::new`] performs that canonicalization exactly once and records
//! whether the caller's argument order was swapped; every consumer of the
//! flag (price display, swap direction) reads it from the key instead of
//! re-deriving it.
//!
//! ## Example
//!
//! ```
//! use eth_uniswap_v3_alloy::network::{NetworkProfile, USDC_ADDRESS, WETH_ADDRESS};
//! use eth_uniswap_v3_alloy::pool::PoolKey;
//!
//! # fn main() -> eth_uniswap_v3_alloy::error::SwapResult<()> {
//! let key = PoolKey::new(WETH_ADDRESS, USDC_ADDRESS, 500)?;
//! let pool = key.address(&NetworkProfile::mainnet());
//!
//! assert_eq!(
//!     pool.to_string(),
//!     "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640"
//! );
//! # Ok(())
//! # }
//! ```

use crate::error::{SwapError, SwapResult};
use crate::network::NetworkProfile;
use alloy::primitives::{keccak256, Address};
use alloy::sol_types::SolValue;

/// Canonical identifier of a Uniswap V3 pool.
///
/// `token0 < token1` always holds by raw byte comparison; the comparison
/// is total and matches the ordering the factory used at deployment, so
/// the derived address lines up with the deployed pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKey {
    /// Lower-ordered token of the pair.
    pub token0: Address,
    /// Higher-ordered token of the pair.
    pub token1: Address,
    /// Fee tier in hundredths of a basis point.
    pub fee: u32,
    /// Whether the constructor swapped the caller's argument order.
    ///
    /// When true, the caller's first token became `token1`. Price display
    /// and swap direction both key off this flag.
    pub inverted: bool,
}

impl PoolKey {
    /// Create a pool key with deterministic token ordering.
    ///
    /// Compares the two addresses byte-wise and swaps them if needed so
    /// that `token0 < token1`, recording the swap in
    /// [`inverted`](Self::inverted).
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::InvalidInput`] if both arguments are the same
    /// address; a pool cannot pair a token with itself.
    pub fn new(token_a: Address, token_b: Address, fee: u32) -> SwapResult<Self> {
        if token_a == token_b {
            return Err(SwapError::invalid_input(
                format!("cannot pair token {token_a} with itself"),
                None,
            ));
        }

        let (token0, token1, inverted) = if token_a < token_b {
            (token_a, token_b, false)
        } else {
            (token_b, token_a, true)
        };

        Ok(Self {
            token0,
            token1,
            fee,
            inverted,
        })
    }

    /// Compute the pool's CREATE2 address under the given network profile.
    ///
    /// Two-stage hash: the salt is the keccak256 of the ABI-encoded
    /// (token0, token1, fee) triple, and the address is the last 20 bytes
    /// of `keccak256(0xff || factory || salt || init_code_hash)`.
    /// Deterministic with no side effects; identical inputs always yield
    /// the identical address.
    #[must_use]
    pub fn address(&self, network: &NetworkProfile) -> Address {
        let salt = keccak256((self.token0, self.token1, self.fee).abi_encode());

        let mut preimage = Vec::with_capacity(85);
        preimage.push(0xff);
        preimage.extend_from_slice(network.factory.as_slice());
        preimage.extend_from_slice(salt.as_slice());
        preimage.extend_from_slice(network.pool_init_code_hash.as_slice());

        let raw = keccak256(&preimage);
        Address::from_slice(&raw[12..])
    }

    /// Swap direction for selling the token the caller listed first.
    ///
    /// True means token0 is sold for token1. For a key constructed as
    /// `PoolKey::new(token_in, token_out, fee)` this is exactly the
    /// `zeroForOne` argument the pool's `swap` expects.
    #[must_use]
    pub const fn zero_for_one(&self) -> bool {
        !self.inverted
    }
}

/// Derive the pool address for a token pair and fee tier in one call.
///
/// Convenience wrapper around [`PoolKey::new`] + [`PoolKey::address`]
/// returning the inverted flag alongside the address.
///
/// # Errors
///
/// Returns [`SwapError::InvalidInput`] if the two token addresses are
/// equal.
pub fn derive_pool_address(
    token_a: Address,
    token_b: Address,
    fee: u32,
    network: &NetworkProfile,
) -> SwapResult<(bool, Address)> {
    let key = PoolKey::new(token_a, token_b, fee)?;
    Ok((key.inverted, key.address(network)))
}
