//! Price conversions between Uniswap V3 `sqrtPriceX96` and decimal prices.
//!
//! A pool stores its spot price as `sqrt(price) * 2^96`, where `price` is
//! the amount of token1 per unit of token0 in raw integer units. Recovering
//! a human-readable number takes three steps:
//!
//! ```text
//! ratio = (sqrtPriceX96 / 2^96)^2        // token1 per token0, raw units
//! price = ratio * 10^(decimals0 - decimals1)
//! price = 1 / price                      // only when the caller's order
//!                                        // was inverted at canonicalization
//! ```
//!
//! The raw value spans up to 160 bits, so it is widened to `f64` *before*
//! squaring; squaring the integer first would overflow 256 bits for large
//! prices and discard low bits for small ones.
//!
//! # Known limitations
//!
//! Both directions use double-precision arithmetic internally. They are
//! accurate to roughly 1 part in 10^15 and round-trip well inside 1e-9,
//! but they are not bit-exact against the chain's fixed-point math. Pairs
//! whose decimal counts differ by more than 18 push past what a double
//! mantissa can carry; such conversions succeed with reduced accuracy and
//! log a warning.
//!
//! # Example
//!
//! ```
//! use alloy::primitives::U256;
//! use eth_uniswap_v3_alloy::price::sqrt_price_x96_to_price;
//!
//! // USDC/WETH at ~2765 USDC per WETH. token0 = USDC (6 decimals),
//! // token1 = WETH (18 decimals); the caller asked WETH-first, so the
//! // canonicalization inverted the pair.
//! let sqrt_price = U256::from_str_radix("1506673274302120988651364689808458", 10).unwrap();
//! let price = sqrt_price_x96_to_price(sqrt_price, 6, 18, true).unwrap();
//! assert!((price - 2765.2).abs() < 1.0);
//! ```

use crate::error::{SwapError, SwapResult};
use alloy::primitives::U256;
use tracing::warn;

/// Decimal-count gap beyond which double precision degrades noticeably.
///
/// `10^18` already needs ~60 bits against the 53 a double mantissa
/// carries; anything wider is best-effort only.
const DECIMAL_GAP_WARN_LIMIT: i32 = 18;

/// Convert a pool's `sqrtPriceX96` to a decimal price.
///
/// `decimals0` and `decimals1` are the decimal counts of the pool's
/// canonical token0 and token1. Pass `inverted = true` when the caller's
/// original token order was swapped during canonicalization; the result is
/// then the reciprocal, i.e. the price of token0 denominated in token1 as
/// seen from the caller's order.
///
/// # Errors
///
/// Returns [`SwapError::DivisionByZero`] if `inverted` is set and the
/// ratio is zero (a zero `sqrtPriceX96`, or one so small the scaled ratio
/// underflows). Returns [`SwapError::InvalidInput`] if the decimal
/// adjustment overflows double precision.
pub fn sqrt_price_x96_to_price(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
    inverted: bool,
) -> SwapResult<f64> {
    if sqrt_price_x96.is_zero() && !inverted {
        return Ok(0.0);
    }

    let gap = i32::from(decimals0) - i32::from(decimals1);
    if gap.abs() > DECIMAL_GAP_WARN_LIMIT {
        warn!(
            "Decimal gap of {gap} exceeds {DECIMAL_GAP_WARN_LIMIT}; price precision is reduced"
        );
    }

    let sqrt_ratio = u256_to_f64(sqrt_price_x96) / 2f64.powi(96);
    let ratio = sqrt_ratio.powi(2) * 10f64.powi(gap);

    if !ratio.is_finite() {
        return Err(SwapError::invalid_input(
            format!("decimal adjustment 10^{gap} overflows double precision"),
            None,
        ));
    }

    if inverted {
        if ratio == 0.0 {
            return Err(SwapError::division_by_zero(
                "cannot invert a zero price ratio",
            ));
        }
        Ok(ratio.recip())
    } else {
        Ok(ratio)
    }
}

/// Convert a decimal price back to a `sqrtPriceX96` value.
///
/// The price must be expressed in the pool's canonical direction (token1
/// per token0, human decimal units). Used when constructing an explicit
/// price limit for a swap.
///
/// This direction is approximate: it goes through double-precision
/// division and square root, so the result is not bit-exact against a
/// value the chain itself would compute. Callers bounding slippage are
/// unaffected; callers needing exact fixed-point equality should not use
/// this function.
///
/// # Errors
///
/// Returns [`SwapError::InvalidInput`] if the price is negative or not
/// finite, or if the resulting value exceeds the 160-bit range of the
/// on-chain encoding.
pub fn price_to_sqrt_price_x96(price: f64, decimals0: u8, decimals1: u8) -> SwapResult<U256> {
    if !price.is_finite() || price < 0.0 {
        return Err(SwapError::invalid_input(
            format!("price must be finite and non-negative, got {price}"),
            None,
        ));
    }

    if price == 0.0 {
        return Ok(U256::ZERO);
    }

    let gap = i32::from(decimals0) - i32::from(decimals1);
    if gap.abs() > DECIMAL_GAP_WARN_LIMIT {
        warn!(
            "Decimal gap of {gap} exceeds {DECIMAL_GAP_WARN_LIMIT}; sqrt price precision is reduced"
        );
    }

    let raw_ratio = price / 10f64.powi(gap);
    let scaled = raw_ratio.sqrt() * 2f64.powi(96);

    if !scaled.is_finite() || scaled >= 2f64.powi(160) {
        return Err(SwapError::invalid_input(
            format!("price {price} is outside the 160-bit sqrt price range"),
            None,
        ));
    }

    Ok(f64_to_u256(scaled))
}

/// Widen a `U256` to `f64`, rounding to nearest.
///
/// Folds the limbs from most to least significant. Values above 2^53 lose
/// low bits, which is exactly the precision `f64` offers.
#[allow(clippy::cast_precision_loss)]
fn u256_to_f64(value: U256) -> f64 {
    let base = 2f64.powi(64);
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc.mul_add(base, limb as f64))
}

/// Truncate a finite, non-negative `f64` to a `U256`.
///
/// Decomposes the float into mantissa and exponent so that integers far
/// beyond 2^64 convert without intermediate overflow. Fractional values
/// below one truncate to zero.
fn f64_to_u256(value: f64) -> U256 {
    if value < 1.0 {
        return U256::ZERO;
    }

    let bits = value.to_bits();
    let raw_exponent = (bits >> 52) & 0x7ff;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let wide = U256::from(mantissa);

    // The mantissa carries 52 fractional bits, so the effective shift is
    // offset by 1023 (exponent bias) + 52.
    if raw_exponent >= 1075 {
        wide << usize::try_from(raw_exponent - 1075).unwrap_or(usize::MAX)
    } else {
        wide >> usize::try_from(1075 - raw_exponent).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_sqrt_price() -> U256 {
        // USDC/WETH mainnet snapshot, ~2765 USDC per WETH.
        U256::from_str_radix("1506673274302120988651364689808458", 10).unwrap_or(U256::ZERO)
    }

    #[test]
    fn test_known_vector_inverted() {
        let result = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, true);
        assert!(result.is_ok());
        let price = result.unwrap_or(0.0);
        assert!(
            (price - 2765.2).abs() < 1.0,
            "Expected ~2765 USDC/WETH, got {price}"
        );
    }

    #[test]
    fn test_known_vector_direct() {
        let result = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, false);
        assert!(result.is_ok());
        let price = result.unwrap_or(0.0);
        let expected = 3.616_421e-4;
        assert!(
            ((price - expected) / expected).abs() < 1e-5,
            "Expected ~{expected} WETH/USDC, got {price}"
        );
    }

    #[test]
    fn test_direct_and_inverted_are_reciprocal() {
        let direct = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, false).unwrap_or(0.0);
        let inverted = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, true).unwrap_or(0.0);
        assert!((direct * inverted - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sqrt_price_yields_zero() {
        let result = sqrt_price_x96_to_price(U256::ZERO, 6, 18, false);
        assert!(result.is_ok());
        assert!(result.unwrap_or(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_sqrt_price_inverted_is_error() {
        let result = sqrt_price_x96_to_price(U256::ZERO, 6, 18, true);
        assert!(matches!(result, Err(SwapError::DivisionByZero { .. })));
    }

    #[test]
    fn test_unit_price_with_equal_decimals() {
        let sqrt_price = U256::from(1u8) << 96;
        let result = sqrt_price_x96_to_price(sqrt_price, 18, 18, false);
        assert!(result.is_ok());
        let price = result.unwrap_or(0.0);
        assert!((price - 1.0).abs() < 1e-15, "Expected 1.0, got {price}");
    }

    #[test]
    fn test_decimals_difference_scales_by_ten() {
        let sqrt_price = known_sqrt_price();
        let base = sqrt_price_x96_to_price(sqrt_price, 6, 18, false).unwrap_or(0.0);
        let bumped = sqrt_price_x96_to_price(sqrt_price, 7, 18, false).unwrap_or(0.0);
        assert!(
            ((bumped - base * 10.0) / bumped).abs() < 1e-12,
            "Raising decimals0 by one should scale the price by ten"
        );
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let cases = [
            (2765.17_f64, 6u8, 18u8),
            (0.000_361_6, 18, 6),
            (1.0, 18, 18),
            (1234.5678, 8, 8),
            (0.5, 0, 18),
            (42.0, 18, 0),
        ];

        for (price, d0, d1) in cases {
            let encoded = price_to_sqrt_price_x96(price, d0, d1);
            assert!(encoded.is_ok(), "encode failed for {price} ({d0}/{d1})");
            let decoded = sqrt_price_x96_to_price(encoded.unwrap_or(U256::ZERO), d0, d1, false);
            assert!(decoded.is_ok(), "decode failed for {price} ({d0}/{d1})");
            let recovered = decoded.unwrap_or(0.0);
            assert!(
                ((recovered - price) / price).abs() < 1e-9,
                "Round trip drifted: {price} -> {recovered} ({d0}/{d1})"
            );
        }
    }

    #[test]
    fn test_unit_price_encodes_exactly() {
        let result = price_to_sqrt_price_x96(1.0, 18, 18);
        assert!(result.is_ok());
        assert_eq!(result.unwrap_or(U256::ZERO), U256::from(1u8) << 96);
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = price_to_sqrt_price_x96(-1.0, 6, 18);
        assert!(matches!(result, Err(SwapError::InvalidInput { .. })));
    }

    #[test]
    fn test_non_finite_price_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = price_to_sqrt_price_x96(bad, 6, 18);
            assert!(matches!(result, Err(SwapError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_zero_price_encodes_to_zero() {
        let result = price_to_sqrt_price_x96(0.0, 6, 18);
        assert!(result.is_ok());
        assert_eq!(result.unwrap_or(U256::from(1u8)), U256::ZERO);
    }

    #[test]
    fn test_out_of_range_price_rejected() {
        // sqrt(1e60) * 2^96 needs more than 160 bits.
        let result = price_to_sqrt_price_x96(1e60, 18, 18);
        assert!(matches!(result, Err(SwapError::InvalidInput { .. })));
    }

    #[test]
    fn test_large_decimal_gap_still_converts() {
        // Gap of 30 is past the warning limit but must still produce a
        // finite result.
        let result = sqrt_price_x96_to_price(known_sqrt_price(), 36, 6, false);
        assert!(result.is_ok());
        assert!(result.unwrap_or(f64::NAN).is_finite());
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let first = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, true).unwrap_or(0.0);
        for _ in 0..10 {
            let again = sqrt_price_x96_to_price(known_sqrt_price(), 6, 18, true).unwrap_or(1.0);
            assert!((first - again).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_u256_to_f64_small_values_exact() {
        assert!((u256_to_f64(U256::from(12_345u64)) - 12_345.0).abs() < f64::EPSILON);
        assert!(u256_to_f64(U256::ZERO).abs() < f64::EPSILON);
    }

    #[test]
    fn test_u256_to_f64_powers_of_two_exact() {
        let big = U256::from(1u8) << 200;
        assert!((u256_to_f64(big) - 2f64.powi(200)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_f64_to_u256_truncates() {
        assert_eq!(f64_to_u256(1.9), U256::from(1u8));
        assert_eq!(f64_to_u256(0.99), U256::ZERO);
        assert_eq!(f64_to_u256(2f64.powi(100)), U256::from(1u8) << 100);
    }
}
