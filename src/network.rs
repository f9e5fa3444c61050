//! Network profiles for chain-specific Uniswap V3 constants.
//!
//! Pool address derivation depends on two values that differ per deployment:
//! the factory contract address and the hash of the pool contract's init
//! code. Rather than baking these in as process-wide globals, this module
//! exposes them as a [`NetworkProfile`] record that is selected once at
//! startup and passed explicitly into every derivation.
//!
//! ## Example
//!
//! ```
//! use eth_uniswap_v3_alloy::network::NetworkProfile;
//!
//! let network = NetworkProfile::mainnet();
//! assert_eq!(network.chain_id, 1);
//! ```

use alloy::primitives::{address, b256, Address, B256};

/// Uniswap V3 factory contract address on Ethereum mainnet.
pub const UNISWAP_V3_FACTORY: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

/// Keccak256 hash of the Uniswap V3 pool contract init code.
///
/// Combined with the factory address and the pool key, this fixes the
/// CREATE2 address of every pool the factory deploys.
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// WETH (Wrapped Ether) token address on Ethereum mainnet.
pub const WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// USDC (USD Coin) token address on Ethereum mainnet.
pub const USDC_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// USDT (Tether USD) token address on Ethereum mainnet.
pub const USDT_ADDRESS: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

/// DAI stablecoin token address on Ethereum mainnet.
pub const DAI_ADDRESS: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

/// Fee tier constants, in hundredths of a basis point.
pub mod fee_tiers {
    /// 0.01% fee, used by very stable pairs.
    pub const FEE_100: u32 = 100;

    /// 0.05% fee, used by stable pairs.
    pub const FEE_500: u32 = 500;

    /// 0.30% fee, used by most pairs.
    pub const FEE_3000: u32 = 3000;

    /// 1.00% fee, used by exotic pairs.
    pub const FEE_10000: u32 = 10000;
}

/// Chain-specific constants required to derive pool addresses and route
/// swaps.
///
/// A profile is plain data: copying it is cheap and no global state is
/// involved. The [`mainnet`](Self::mainnet) profile ships with the
/// published Uniswap V3 constants; other deployments construct their own
/// via [`new`](Self::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProfile {
    /// EIP-155 chain id of the target network.
    pub chain_id: u64,
    /// Uniswap V3 factory contract address.
    pub factory: Address,
    /// Keccak256 hash of the pool contract init code.
    pub pool_init_code_hash: B256,
    /// Swap wrapper contract used to execute pool swaps, if deployed.
    ///
    /// The wrapper exposes the raw pool `swap` signature and pays the
    /// pool from the caller's approved balance. There is no canonical
    /// mainnet deployment, so the mainnet profile leaves this unset.
    pub swap_contract: Option<Address>,
}

impl NetworkProfile {
    /// Profile for Ethereum mainnet with the published Uniswap V3
    /// constants.
    #[must_use]
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            factory: UNISWAP_V3_FACTORY,
            pool_init_code_hash: POOL_INIT_CODE_HASH,
            swap_contract: None,
        }
    }

    /// Construct a profile for a non-mainnet deployment.
    #[must_use]
    pub const fn new(chain_id: u64, factory: Address, pool_init_code_hash: B256) -> Self {
        Self {
            chain_id,
            factory,
            pool_init_code_hash,
            swap_contract: None,
        }
    }

    /// Return a copy of the profile with the swap wrapper contract set.
    #[must_use]
    pub const fn with_swap_contract(mut self, swap_contract: Address) -> Self {
        self.swap_contract = Some(swap_contract);
        self
    }
}
