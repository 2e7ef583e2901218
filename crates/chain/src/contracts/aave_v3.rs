//! AAVE V3 Pool read interface.
//!
//! Only `getUserAccountData(address)` is bound: it is the single read the
//! scanner needs, and its answer is identical in layout on every deployment.

use alloy::primitives::{Address, Bytes};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::error::ChainError;

sol! {
    /// Aave V3 Pool interface (account data accessor only)
    interface IPool {
        function getUserAccountData(address user) external view returns (
            uint256 totalCollateralBase,
            uint256 totalDebtBase,
            uint256 availableBorrowsBase,
            uint256 currentLiquidationThreshold,
            uint256 ltv,
            uint256 healthFactor
        );
    }
}

/// `bytes4(keccak256("getUserAccountData(address)"))` = `0xbf92857c`
pub const GET_USER_ACCOUNT_DATA_SELECTOR: [u8; 4] = IPool::getUserAccountDataCall::SELECTOR;

/// Length of the encoded call: selector plus one 32-byte argument slot.
pub const ACCOUNT_DATA_CALLDATA_LEN: usize = 4 + 32;

/// Parse an externally supplied account address.
///
/// Requires a `0x` (or `0X`) prefix followed by exactly 40 hex characters.
/// Surrounding whitespace is rejected. Checksum casing is not enforced.
pub fn parse_account(input: &str) -> Result<Address, ChainError> {
    let invalid = |reason| ChainError::InvalidAddress {
        input: input.to_string(),
        reason,
    };

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| invalid("missing 0x prefix"))?;

    if digits.len() != 40 {
        return Err(invalid("expected 40 hex characters"));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid("contains non-hex characters"))?;
    Ok(Address::from(bytes))
}

/// Encode `getUserAccountData(account)`.
///
/// The result does not depend on the chain, so callers build it once per scan.
pub fn encode_account_data_call(account: Address) -> Bytes {
    IPool::getUserAccountDataCall { user: account }
        .abi_encode()
        .into()
}

/// A read-only contract call: target pool plus encoded calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Pool contract address
    pub to: Address,
    /// Selector followed by ABI-encoded arguments
    pub data: Bytes,
}

impl CallRequest {
    /// Build a call against `pool` with already-encoded calldata.
    pub fn new(pool: Address, data: Bytes) -> Self {
        Self { to: pool, data }
    }

    /// Build the account data call for `account` against `pool`.
    pub fn account_data(pool: Address, account: Address) -> Self {
        Self::new(pool, encode_account_data_call(account))
    }

    /// Calldata as a `0x`-prefixed lowercase hex string.
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }
}
