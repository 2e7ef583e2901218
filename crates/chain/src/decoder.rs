//! Decoder for `getUserAccountData` return data.
//!
//! The return value is six consecutive 32-byte big-endian words, decoded
//! through the `IPool` binding:
//!
//! | slot | field                         | scale          |
//! |------|-------------------------------|----------------|
//! | 0    | totalCollateralBase           | 1e8 (USD)      |
//! | 1    | totalDebtBase                 | 1e8 (USD)      |
//! | 2    | availableBorrowsBase          | 1e8 (USD)      |
//! | 3    | currentLiquidationThreshold   | bps            |
//! | 4    | ltv                           | bps            |
//! | 5    | healthFactor                  | 1e18 (WAD)     |

use std::cmp::Ordering;
use std::fmt;

use alloy::primitives::U256;
use alloy::sol_types::SolCall;
use serde::{Serialize, Serializer};

use crate::contracts::IPool;
use crate::error::ChainError;
use crate::u256_math::{base_to_usd, bps_to_percent, wad_to_f64};

/// Number of return words.
pub const ACCOUNT_DATA_SLOTS: usize = 6;

/// Hex characters per 32-byte word.
pub const SLOT_HEX_LEN: usize = 64;

/// Minimum response length in hex characters, excluding `0x`.
pub const ACCOUNT_DATA_HEX_LEN: usize = ACCOUNT_DATA_SLOTS * SLOT_HEX_LEN;

/// Undecoded words exactly as returned by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAccountData {
    pub total_collateral_base: U256,
    pub total_debt_base: U256,
    pub available_borrows_base: U256,
    pub current_liquidation_threshold: U256,
    pub ltv: U256,
    pub health_factor: U256,
}

impl RawAccountData {
    /// Parse the six return words from a hex string (with or without `0x`).
    ///
    /// Trailing data beyond the sixth word is ignored.
    pub fn from_hex(data: &str) -> Result<Self, ChainError> {
        let digits = data
            .strip_prefix("0x")
            .or_else(|| data.strip_prefix("0X"))
            .unwrap_or(data);

        if digits.len() < ACCOUNT_DATA_HEX_LEN {
            return Err(ChainError::TruncatedResponse {
                len: digits.len(),
                expected: ACCOUNT_DATA_HEX_LEN,
            });
        }

        let body = digits
            .get(..ACCOUNT_DATA_HEX_LEN)
            .ok_or_else(|| ChainError::DecodeFailure("response is not ASCII hex".to_string()))?;

        let mut bytes = [0u8; ACCOUNT_DATA_HEX_LEN / 2];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| ChainError::DecodeFailure(e.to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Decode ABI-encoded return data through the `IPool` binding.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ChainError> {
        let ret = IPool::getUserAccountDataCall::abi_decode_returns(data, false)
            .map_err(|e| ChainError::DecodeFailure(e.to_string()))?;

        Ok(Self {
            total_collateral_base: ret.totalCollateralBase,
            total_debt_base: ret.totalDebtBase,
            available_borrows_base: ret.availableBorrowsBase,
            current_liquidation_threshold: ret.currentLiquidationThreshold,
            ltv: ret.ltv,
            health_factor: ret.healthFactor,
        })
    }

    /// No collateral and no debt: the account has never used this pool.
    pub fn is_empty(&self) -> bool {
        self.total_collateral_base.is_zero() && self.total_debt_base.is_zero()
    }

    /// Whether the account carries any debt.
    pub fn has_debt(&self) -> bool {
        !self.total_debt_base.is_zero()
    }
}

/// Health factor: finite ratio, or infinite when the account has no debt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthFactor {
    Finite(f64),
    /// No debt. The on-chain word is meaningless in this case.
    Infinite,
}

impl HealthFactor {
    /// Finite value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Value as f64, with `Infinite` mapped to `f64::INFINITY`.
    pub fn as_f64(&self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }

    /// Total order: ascending by value, `Infinite` last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.as_f64().total_cmp(&other.as_f64())
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v:.4}"),
            Self::Infinite => f.write_str("inf"),
        }
    }
}

impl Serialize for HealthFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_f64(*v),
            Self::Infinite => serializer.serialize_str("inf"),
        }
    }
}

/// Decoded account snapshot for one pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountData {
    /// Total collateral (USD)
    pub collateral_usd: f64,
    /// Total debt (USD)
    pub debt_usd: f64,
    /// Remaining borrowing capacity (USD)
    pub available_borrows_usd: f64,
    /// Loan-to-value (percent)
    pub ltv_pct: f64,
    /// Liquidation threshold (percent)
    pub liquidation_threshold_pct: f64,
    pub health_factor: HealthFactor,
    pub has_debt: bool,
}

impl AccountData {
    /// Scale raw words. Returns `None` when the account holds nothing.
    pub fn from_raw(raw: &RawAccountData) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let has_debt = raw.has_debt();
        let health_factor = if has_debt {
            HealthFactor::Finite(wad_to_f64(raw.health_factor))
        } else {
            HealthFactor::Infinite
        };

        Some(Self {
            collateral_usd: base_to_usd(raw.total_collateral_base),
            debt_usd: base_to_usd(raw.total_debt_base),
            available_borrows_usd: base_to_usd(raw.available_borrows_base),
            ltv_pct: bps_to_percent(raw.ltv),
            liquidation_threshold_pct: bps_to_percent(raw.current_liquidation_threshold),
            health_factor,
            has_debt,
        })
    }
}

/// Decode a `getUserAccountData` response.
///
/// `Ok(None)` means the account has no position on this pool, which is not an
/// error. Short or non-hex input is.
pub fn decode_account_data(data: &str) -> Result<Option<AccountData>, ChainError> {
    let raw = RawAccountData::from_hex(data)?;
    Ok(AccountData::from_raw(&raw))
}
