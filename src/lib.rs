//! # Ethereum Uniswap V3 Swap Toolkit
//!
//! Production-grade Uniswap V3 toolkit for Ethereum using [Alloy](https://github.com/alloy-rs/alloy).
//!
//! This library provides a modular, testable architecture for working with
//! Uniswap V3 pools: deriving pool addresses offline via CREATE2, decoding
//! `sqrtPriceX96` into decimal prices with proper token-decimal handling,
//! managing ERC-20 allowances, and executing swaps through a deployed
//! wrapper contract.
//!
//! ## Features
//!
//! - **Offline pool discovery** - CREATE2 address derivation, no factory call
//! - **Price codec** - `sqrtPriceX96` ↔ decimal price in either pair order
//! - **Type-safe contract bindings** using Alloy's `sol!` macro
//! - **Allowance gating** - approve only when the current allowance is short
//! - **Bounded receipt polling** with jitter for transaction inclusion
//! - **Production error handling** with unified `SwapError`
//! - **Full async/await** support with Tokio
//!
//! ## Architecture
//!
//! The crate is organized into independent layers:
//!
//! 1. **Config Layer** ([`config`]) - Environment variable loading
//! 2. **RPC Layer** ([`rpc`]) - Providers, balances, receipt polling
//! 3. **Network Layer** ([`network`]) - Chain profiles and protocol constants
//! 4. **Pool Layer** ([`pool`]) - Token ordering and CREATE2 derivation
//! 5. **Price Layer** ([`price`]) - `sqrtPriceX96` conversions
//! 6. **ERC-20 Layer** ([`erc20`]) - Token metadata, balances, approvals
//! 7. **Uniswap Layer** ([`uniswap`]) - Pool state reads and swap execution
//!
//! ## Quick Start
//!
//! ### Using the CLI
//!
//! ```bash
//! # Derive a pool address (no RPC needed)
//! cargo run --release -- pool USDC WETH --fee 500
//!
//! # Quote the current price
//! cargo run --release -- price WETH USDC --fee 500
//!
//! # Swap 0.1 WETH for USDC through the configured wrapper
//! cargo run --release -- swap WETH USDC --fee 500 --amount 100000000000000000
//! ```
//!
//! ### Using as a Library
//!
//! ```rust,no_run
//! use eth_uniswap_v3_alloy::network::{fee_tiers, NetworkProfile, USDC_ADDRESS, WETH_ADDRESS};
//! use eth_uniswap_v3_alloy::pool::PoolKey;
//! use eth_uniswap_v3_alloy::price::sqrt_price_x96_to_price;
//! use eth_uniswap_v3_alloy::rpc::create_provider;
//! use eth_uniswap_v3_alloy::uniswap::fetch_slot0;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider("https://eth-mainnet.g.alchemy.com/v2/KEY").await?;
//!
//!     // USDC/WETH 0.05% pool, derived without touching the chain
//!     let key = PoolKey::new(WETH_ADDRESS, USDC_ADDRESS, fee_tiers::FEE_500)?;
//!     let pool = key.address(&NetworkProfile::mainnet());
//!
//!     // Read slot0 and convert to a WETH price in USDC
//!     let slot0 = fetch_slot0(&provider, pool).await?;
//!     let price = sqrt_price_x96_to_price(slot0.sqrt_price_x96, 6, 18, key.inverted)?;
//!     println!("1 WETH = {price:.2} USDC");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Setup
//!
//! Create a `.env` file with an RPC endpoint (and, for write commands, a
//! signing key and the wrapper contract address):
//!
//! ```text
//! ALCHEMY_API_KEY=your_key_here
//! PRIVATE_KEY=0x...
//! SWAP_CONTRACT=0x...
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`error::SwapResult<T>`](error::SwapResult) for
//! consistent error propagation:
//!
//! ```rust
//! use eth_uniswap_v3_alloy::error::{SwapError, SwapResult};
//!
//! fn example() -> SwapResult<()> {
//!     // Operations that can fail return SwapResult
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! Run the test suite:
//!
//! ```bash
//! # All tests
//! cargo test
//!
//! # Unit tests only
//! cargo test --lib
//!
//! # Integration tests
//! cargo test --test '*'
//! ```
//!
//! ## Documentation
//!
//! Generate and view the documentation:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//!
//! at your option.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod erc20;
pub mod error;
pub mod network;
pub mod observability;
pub mod pool;
pub mod price;
pub mod rpc;
pub mod uniswap;
