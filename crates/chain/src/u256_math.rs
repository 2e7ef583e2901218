//! U256 → f64 scaling for the fixed-point values Aave returns.
//!
//! Values are converted for display and risk classification only. Exact
//! comparisons against zero are done on the raw U256 before any conversion.

use alloy::primitives::U256;

/// Aave base currency decimals (USD, 8 decimals)
pub const BASE_CURRENCY_DECIMALS: u8 = 8;

/// Health factor decimals (WAD)
pub const WAD_DECIMALS: u8 = 18;

/// LTV and liquidation threshold are basis points; `/ 100` yields percent.
pub const BPS_PER_PERCENT: f64 = 100.0;

/// Exact f64 powers of ten (every 10^n with n <= 22 is representable).
const POW10_F64: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// 10^exp as f64.
#[inline(always)]
pub fn pow10_f64(exp: u8) -> f64 {
    POW10_F64
        .get(exp as usize)
        .copied()
        .unwrap_or_else(|| 10f64.powi(exp as i32))
}

/// Convert a U256 to the nearest f64.
///
/// Values below 2^64 convert exactly as a single limb; larger values are
/// accumulated limb by limb.
#[inline(always)]
pub fn u256_to_f64(value: U256) -> f64 {
    let limbs = value.as_limbs();
    if limbs[1] == 0 && limbs[2] == 0 && limbs[3] == 0 {
        return limbs[0] as f64;
    }

    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    limbs
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * TWO_POW_64 + *limb as f64)
}

/// Scale a fixed-point integer with `decimals` decimals down to f64.
#[inline(always)]
pub fn scale_down(value: U256, decimals: u8) -> f64 {
    u256_to_f64(value) / pow10_f64(decimals)
}

/// Base currency amount (8 decimals) to USD.
#[inline(always)]
pub fn base_to_usd(value: U256) -> f64 {
    scale_down(value, BASE_CURRENCY_DECIMALS)
}

/// WAD (18 decimals) to f64.
#[inline(always)]
pub fn wad_to_f64(value: U256) -> f64 {
    scale_down(value, WAD_DECIMALS)
}

/// Basis points to percent (8000 → 80.0).
#[inline(always)]
pub fn bps_to_percent(value: U256) -> f64 {
    u256_to_f64(value) / BPS_PER_PERCENT
}
