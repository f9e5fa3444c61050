//! Command-line interface for the Uniswap V3 swap toolkit.
//!
//! This module provides a CLI covering the whole workflow: inspecting the
//! chain, deriving pool addresses, quoting prices, and executing swaps
//! through the deployed wrapper contract.
//!
//! # Commands
//!
//! - `block`: Print the latest block number
//! - `balance`: Show the ETH balance of an address
//! - `token`: Show ERC-20 metadata (and optionally a holder's balance)
//! - `pool`: Derive the pool address for a token pair and fee tier
//! - `price`: Quote the current pool price for a token pair
//! - `approve`: Approve a spender and wait for inclusion
//! - `swap`: Swap an exact input amount through a pool
//!
//! # Example
//!
//! ```bash
//! # Latest block
//! eth-uniswap-v3-alloy block
//!
//! # Pool address for USDC/WETH at the 0.05% tier
//! eth-uniswap-v3-alloy pool USDC WETH --fee 500
//!
//! # Current price, machine readable
//! eth-uniswap-v3-alloy --json price WETH USDC --fee 500
//! ```

use crate::config::Config;
use crate::erc20::{self, TokenInfo};
use crate::error::{SwapError, SwapResult};
use crate::network::{
    fee_tiers, NetworkProfile, DAI_ADDRESS, USDC_ADDRESS, USDT_ADDRESS, WETH_ADDRESS,
};
use crate::pool::PoolKey;
use crate::price::sqrt_price_x96_to_price;
use crate::rpc::{
    create_provider, create_wallet_provider, get_eth_balance, get_latest_block, parse_signer,
};
use crate::uniswap::{self, SwapParams};
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

/// Uniswap V3 swap toolkit
#[derive(Parser, Debug)]
#[command(name = "eth-uniswap-v3-alloy")]
#[command(about = "Uniswap V3 pool discovery, price quoting, and swaps on Ethereum", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the latest block number
    Block,

    /// Show the ETH balance of an address
    Balance {
        /// Address to query (defaults to the configured signer)
        address: Option<String>,
    },

    /// Show name and decimals of an ERC-20 token
    Token {
        /// Token address or symbol (WETH, USDC, USDT, DAI)
        address: String,

        /// Also show this holder's token balance
        #[arg(long)]
        owner: Option<String>,
    },

    /// Derive the pool address for a token pair and fee tier
    Pool {
        /// First token (address or symbol)
        token_a: String,

        /// Second token (address or symbol)
        token_b: String,

        /// Fee tier in hundredths of a basis point
        #[arg(short, long, default_value_t = fee_tiers::FEE_3000)]
        fee: u32,
    },

    /// Quote the current pool price for a token pair
    Price {
        /// Token to sell (address or symbol)
        token_in: String,

        /// Token to buy (address or symbol)
        token_out: String,

        /// Fee tier in hundredths of a basis point
        #[arg(short, long, default_value_t = fee_tiers::FEE_3000)]
        fee: u32,
    },

    /// Approve a spender for an ERC-20 token and wait for inclusion
    Approve {
        /// Token to approve (address or symbol)
        token: String,

        /// Spender being approved
        spender: String,

        /// Amount in base units
        amount: String,
    },

    /// Swap an exact input amount through a pool
    Swap(SwapArgs),
}

/// Arguments for the swap command.
#[derive(Args, Debug)]
struct SwapArgs {
    /// Token to sell (address or symbol)
    token_in: String,

    /// Token to buy (address or symbol)
    token_out: String,

    /// Fee tier in hundredths of a basis point
    #[arg(short, long, default_value_t = fee_tiers::FEE_3000)]
    fee: u32,

    /// Exact input amount in base units
    #[arg(short, long)]
    amount: String,

    /// Recipient of the output tokens (defaults to the signer)
    #[arg(long)]
    recipient: Option<String>,

    /// Override the sqrtPriceX96 limit (decimal or 0x-prefixed)
    #[arg(long)]
    price_limit: Option<String>,
}

/// Parse CLI arguments and execute the appropriate command.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration loading fails
/// - RPC connection fails
/// - Command execution fails
pub async fn run() -> SwapResult<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Block => run_block_command(&config, cli.json).await,
        Commands::Balance { address } => {
            run_balance_command(&config, address.as_deref(), cli.json).await
        }
        Commands::Token { address, owner } => {
            run_token_command(&config, &address, owner.as_deref(), cli.json).await
        }
        Commands::Pool {
            token_a,
            token_b,
            fee,
        } => run_pool_command(&token_a, &token_b, fee, cli.json),
        Commands::Price {
            token_in,
            token_out,
            fee,
        } => run_price_command(&config, &token_in, &token_out, fee, cli.json).await,
        Commands::Approve {
            token,
            spender,
            amount,
        } => run_approve_command(&config, &token, &spender, &amount, cli.json).await,
        Commands::Swap(args) => run_swap_command(&config, &args, cli.json).await,
    }
}

/// Execute the block command.
async fn run_block_command(config: &Config, json: bool) -> SwapResult<()> {
    info!("Fetching latest block number");

    let provider = create_provider(config.rpc_url()).await?;
    let block = get_latest_block(&provider).await?;

    if json {
        print_json(&json!({ "block": block }));
    } else {
        println!("{} Latest block: {}", "⛓".cyan(), block.to_string().yellow());
    }

    Ok(())
}

/// Execute the balance command.
async fn run_balance_command(
    config: &Config,
    address: Option<&str>,
    json: bool,
) -> SwapResult<()> {
    let address = match address {
        Some(raw) => parse_address(raw)?,
        None => configured_signer(config)?.address(),
    };

    info!(%address, "Fetching ETH balance");

    let provider = create_provider(config.rpc_url()).await?;
    let balance = get_eth_balance(&provider, address).await?;

    if json {
        print_json(&json!({
            "address": address,
            "wei": balance.to_string(),
            "eth": format_amount(balance, 18),
        }));
    } else {
        println!(
            "{} Address: {} | Balance: {} ETH",
            "💰".cyan(),
            address.to_string().yellow(),
            format_amount(balance, 18).green().bold()
        );
    }

    Ok(())
}

/// Execute the token command.
async fn run_token_command(
    config: &Config,
    address: &str,
    owner: Option<&str>,
    json: bool,
) -> SwapResult<()> {
    let token = parse_token(address)?;

    info!(%token, "Fetching token metadata");

    let provider = create_provider(config.rpc_url()).await?;
    let token_info = erc20::fetch_token_info(&provider, token).await?;

    let balance = match owner {
        Some(raw) => {
            let owner = parse_address(raw)?;
            Some(erc20::fetch_balance(&provider, token, owner).await?)
        }
        None => None,
    };

    if json {
        print_json(&json!({
            "token": token_info,
            "balance": balance.map(|value| value.to_string()),
        }));
    } else {
        println!(
            "{} {} ({}) | Address: {} | Decimals: {}",
            "🪙".cyan(),
            token_info.name.bold(),
            token_info.symbol.bold(),
            token_info.address.to_string().yellow(),
            token_info.decimals.to_string().blue()
        );
        if let Some(balance) = balance {
            println!(
                "   Balance: {} {}",
                format_amount(balance, token_info.decimals).green().bold(),
                token_info.symbol.bold()
            );
        }
    }

    Ok(())
}

/// Execute the pool command. Pure address derivation, no RPC involved.
fn run_pool_command(token_a: &str, token_b: &str, fee: u32, json: bool) -> SwapResult<()> {
    let key = PoolKey::new(parse_token(token_a)?, parse_token(token_b)?, fee)?;
    let network = NetworkProfile::mainnet();
    let pool = key.address(&network);

    info!(%pool, fee, "Derived pool address");

    if json {
        print_json(&json!({
            "pool": pool,
            "token0": key.token0,
            "token1": key.token1,
            "fee": key.fee,
            "inverted": key.inverted,
            "zero_for_one": key.zero_for_one(),
        }));
    } else {
        println!(
            "{} Pool: {} | token0: {} | token1: {} | fee: {}",
            "🏦".cyan(),
            pool.to_string().yellow(),
            key.token0.to_string().blue(),
            key.token1.to_string().magenta(),
            key.fee.to_string().bold()
        );
        println!(
            "   Selling {} first: zeroForOne = {}",
            token_a,
            key.zero_for_one()
        );
    }

    Ok(())
}

/// Execute the price command.
async fn run_price_command(
    config: &Config,
    token_in: &str,
    token_out: &str,
    fee: u32,
    json: bool,
) -> SwapResult<()> {
    let key = PoolKey::new(parse_token(token_in)?, parse_token(token_out)?, fee)?;
    let network = NetworkProfile::mainnet();
    let pool = key.address(&network);

    info!(%pool, "Quoting pool price");

    let provider = create_provider(config.rpc_url()).await?;
    let (info0, info1) = erc20::fetch_pair_info(&provider, key.token0, key.token1).await?;
    let slot0 = uniswap::fetch_slot0(&provider, pool).await?;

    let price = sqrt_price_x96_to_price(
        slot0.sqrt_price_x96,
        info0.decimals,
        info1.decimals,
        key.inverted,
    )?;

    // Orient the metadata the way the caller asked the question
    let (in_info, out_info) = if key.inverted {
        (&info1, &info0)
    } else {
        (&info0, &info1)
    };

    if json {
        print_json(&json!({
            "pool": pool,
            "tick": slot0.tick,
            "sqrt_price_x96": slot0.sqrt_price_x96.to_string(),
            "token_in": in_info,
            "token_out": out_info,
            "price": price,
        }));
    } else {
        print_price_quote(pool, in_info, out_info, price, slot0.tick);
    }

    Ok(())
}

/// Execute the approve command.
async fn run_approve_command(
    config: &Config,
    token: &str,
    spender: &str,
    amount: &str,
    json: bool,
) -> SwapResult<()> {
    let token = parse_token(token)?;
    let spender = parse_address(spender)?;
    let amount = parse_amount(amount)?;

    let signer = configured_signer(config)?;
    let owner = signer.address();

    info!(%token, %owner, %spender, %amount, "Ensuring allowance");

    let provider = create_wallet_provider(config.rpc_url(), signer).await?;
    let tx_hash = erc20::ensure_allowance(
        &provider,
        token,
        owner,
        spender,
        amount,
        config.poll_interval(),
        config.poll_timeout(),
    )
    .await?;

    if json {
        print_json(&json!({
            "token": token,
            "owner": owner,
            "spender": spender,
            "amount": amount.to_string(),
            "tx_hash": tx_hash,
        }));
    } else {
        tx_hash.map_or_else(
            || {
                println!(
                    "{} Existing allowance already covers the amount",
                    "✅".green()
                );
            },
            |hash| {
                println!(
                    "{} Approval mined: {}",
                    "✅".green(),
                    hash.to_string().yellow()
                );
            },
        );
    }

    Ok(())
}

/// Execute the swap command.
async fn run_swap_command(config: &Config, args: &SwapArgs, json: bool) -> SwapResult<()> {
    let token_in = parse_token(&args.token_in)?;
    let token_out = parse_token(&args.token_out)?;
    let amount_in = parse_amount(&args.amount)?;
    let sqrt_price_limit = args.price_limit.as_deref().map(parse_amount).transpose()?;

    let network = match config.swap_contract() {
        Some(raw) => NetworkProfile::mainnet().with_swap_contract(parse_address(raw)?),
        None => NetworkProfile::mainnet(),
    };

    let signer = configured_signer(config)?;
    let sender = signer.address();
    let recipient = match args.recipient.as_deref() {
        Some(raw) => parse_address(raw)?,
        None => sender,
    };

    info!(%token_in, %token_out, fee = args.fee, %amount_in, "Preparing swap");

    let provider = create_wallet_provider(config.rpc_url(), signer).await?;

    // The wrapper pulls token_in from the caller, so it must be approved
    // before the swap lands
    if let Some(wrapper) = network.swap_contract {
        erc20::ensure_allowance(
            &provider,
            token_in,
            sender,
            wrapper,
            amount_in,
            config.poll_interval(),
            config.poll_timeout(),
        )
        .await?;
    }

    let params = SwapParams {
        token_in,
        token_out,
        fee: args.fee,
        amount_in,
        recipient,
        sqrt_price_limit,
    };

    let outcome = uniswap::execute_swap(
        &provider,
        &network,
        &params,
        config.poll_interval(),
        config.poll_timeout(),
    )
    .await?;

    if json {
        print_json(&outcome);
    } else {
        println!(
            "{} Swap mined in block {} | tx: {} | gas used: {}",
            "✅".green(),
            outcome.block_number.to_string().yellow(),
            outcome.tx_hash.to_string().yellow(),
            outcome.gas_used.to_string().blue()
        );
    }

    Ok(())
}

/// Build a signer from the configured private key.
fn configured_signer(config: &Config) -> SwapResult<PrivateKeySigner> {
    let key = config.private_key().ok_or_else(|| {
        SwapError::config(
            "PRIVATE_KEY is required for commands that sign transactions",
            None,
        )
    })?;
    parse_signer(key)
}

/// Resolve a token argument: a well-known symbol or a raw address.
fn parse_token(input: &str) -> SwapResult<Address> {
    match input.to_ascii_uppercase().as_str() {
        "WETH" => Ok(WETH_ADDRESS),
        "USDC" => Ok(USDC_ADDRESS),
        "USDT" => Ok(USDT_ADDRESS),
        "DAI" => Ok(DAI_ADDRESS),
        _ => parse_address(input),
    }
}

/// Parse a hex Ethereum address argument.
fn parse_address(input: &str) -> SwapResult<Address> {
    input.parse::<Address>().map_err(|e| {
        SwapError::invalid_input(format!("Invalid address '{input}'"), Some(Box::new(e)))
    })
}

/// Parse a base-unit amount argument (decimal or 0x-prefixed).
fn parse_amount(input: &str) -> SwapResult<U256> {
    input.parse::<U256>().map_err(|e| {
        SwapError::invalid_input(format!("Invalid amount '{input}'"), Some(Box::new(e)))
    })
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => error!(error = %e, "Failed to serialize output"),
    }
}

/// Display a price quote with colored formatting.
fn print_price_quote(
    pool: Address,
    in_info: &TokenInfo,
    out_info: &TokenInfo,
    price: f64,
    tick: i32,
) {
    // Timestamp
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    println!(
        "{} {} Pool: {} | Tick: {} | 1 {} = {} {}",
        "📊".cyan(),
        timestamp.to_string().dimmed(),
        pool.to_string().yellow(),
        tick.to_string().blue(),
        in_info.symbol.bold(),
        format!("{price:.6}").green().bold(),
        out_info.symbol.bold()
    );
}

/// Format a base-unit amount with the token's decimal places.
fn format_amount(value: U256, decimals: u8) -> String {
    // Convert U256 to f64 for display (with precision loss for very large values)
    let value_u128 = u128::try_from(value).unwrap_or(u128::MAX);
    #[allow(clippy::cast_precision_loss)]
    let value_float = value_u128 as f64 / 10_f64.powi(i32::from(decimals));

    format!("{value_float:.6}")
}
