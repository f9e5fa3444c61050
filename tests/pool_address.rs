//! Integration tests for CREATE2 pool address derivation.
//!
//! Derived addresses are checked against pools actually deployed on
//! Ethereum mainnet, so any drift in token ordering, ABI encoding, or
//! hashing shows up as a wrong address rather than a subtle bug.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use eth_uniswap_v3_alloy::network::{
    fee_tiers, NetworkProfile, DAI_ADDRESS, USDC_ADDRESS, USDT_ADDRESS, WETH_ADDRESS,
};
use eth_uniswap_v3_alloy::pool::{derive_pool_address, PoolKey};

/// USDC/WETH at the 0.05% tier is the canonical high-volume V3 pool.
#[test]
fn test_usdc_weth_500_matches_mainnet() {
    let network = NetworkProfile::mainnet();
    let key =
        PoolKey::new(USDC_ADDRESS, WETH_ADDRESS, fee_tiers::FEE_500).expect("distinct tokens");

    assert_eq!(
        key.address(&network).to_string(),
        "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640",
        "derived address must match the deployed USDC/WETH 0.05% pool"
    );
    assert!(!key.inverted, "USDC orders below WETH byte-wise");
}

#[test]
fn test_usdc_weth_3000_matches_mainnet() {
    let network = NetworkProfile::mainnet();
    let key =
        PoolKey::new(USDC_ADDRESS, WETH_ADDRESS, fee_tiers::FEE_3000).expect("distinct tokens");

    assert_eq!(
        key.address(&network).to_string(),
        "0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8",
        "derived address must match the deployed USDC/WETH 0.3% pool"
    );
}

#[test]
fn test_weth_usdt_3000_matches_mainnet() {
    let network = NetworkProfile::mainnet();
    let key =
        PoolKey::new(WETH_ADDRESS, USDT_ADDRESS, fee_tiers::FEE_3000).expect("distinct tokens");

    assert_eq!(
        key.address(&network).to_string(),
        "0x4e68Ccd3E89f51C3074ca5072bbAC773960dFa36",
        "derived address must match the deployed WETH/USDT 0.3% pool"
    );
    assert!(!key.inverted, "WETH orders below USDT byte-wise");
}

/// The pool address is a property of the pair, not of the argument order.
#[test]
fn test_argument_order_only_flips_inverted() {
    let network = NetworkProfile::mainnet();

    let forward =
        PoolKey::new(USDC_ADDRESS, WETH_ADDRESS, fee_tiers::FEE_500).expect("distinct tokens");
    let reversed =
        PoolKey::new(WETH_ADDRESS, USDC_ADDRESS, fee_tiers::FEE_500).expect("distinct tokens");

    assert_eq!(forward.address(&network), reversed.address(&network));
    assert_eq!(forward.token0, reversed.token0);
    assert_eq!(forward.token1, reversed.token1);
    assert_ne!(forward.inverted, reversed.inverted);
    assert_ne!(forward.zero_for_one(), reversed.zero_for_one());
}

#[test]
fn test_fee_tiers_yield_distinct_pools() {
    let network = NetworkProfile::mainnet();
    let tiers = [
        fee_tiers::FEE_100,
        fee_tiers::FEE_500,
        fee_tiers::FEE_3000,
        fee_tiers::FEE_10000,
    ];

    let addresses: Vec<_> = tiers
        .iter()
        .map(|&fee| {
            derive_pool_address(USDC_ADDRESS, WETH_ADDRESS, fee, &network)
                .expect("derivation succeeds")
                .1
        })
        .collect();

    for (i, first) in addresses.iter().enumerate() {
        for second in &addresses[i + 1..] {
            assert_ne!(first, second, "fee tiers must map to distinct pools");
        }
    }
}

#[test]
fn test_equal_tokens_rejected() {
    let network = NetworkProfile::mainnet();
    let result = derive_pool_address(WETH_ADDRESS, WETH_ADDRESS, fee_tiers::FEE_3000, &network);
    assert!(result.is_err(), "a token cannot be paired with itself");
}

#[test]
fn test_dai_usdc_orders_canonically() {
    let key = PoolKey::new(USDC_ADDRESS, DAI_ADDRESS, fee_tiers::FEE_100).expect("distinct tokens");

    // DAI (0x6B17...) sorts below USDC (0xA0b8...)
    assert_eq!(key.token0, DAI_ADDRESS);
    assert_eq!(key.token1, USDC_ADDRESS);
    assert!(key.inverted, "caller's first token became token1");
}

/// Derivation is pure: repeated calls agree with themselves.
#[test]
fn test_derivation_is_deterministic() {
    let network = NetworkProfile::mainnet();
    let (inverted_a, pool_a) =
        derive_pool_address(WETH_ADDRESS, USDC_ADDRESS, fee_tiers::FEE_500, &network)
            .expect("derivation succeeds");
    let (inverted_b, pool_b) =
        derive_pool_address(WETH_ADDRESS, USDC_ADDRESS, fee_tiers::FEE_500, &network)
            .expect("derivation succeeds");

    assert_eq!(pool_a, pool_b);
    assert_eq!(inverted_a, inverted_b);
}
