//! Chain interaction layer for the Aave v3 position scanner.
//!
//! This crate provides:
//! - Calldata encoding for `Pool.getUserAccountData(address)`
//! - A JSON-RPC transport seam with a reqwest implementation
//! - Ordered per-chain endpoint fallback
//! - Fixed-layout decoding of the account data response
//!
//! Everything here is read-only: no signing, no transaction submission.

pub mod contracts;
pub mod decoder;
mod endpoint;
mod error;
pub mod transport;
pub mod u256_math;

pub use contracts::{encode_account_data_call, parse_account, CallRequest, IPool};
pub use decoder::{decode_account_data, AccountData, HealthFactor, RawAccountData};
pub use endpoint::{EndpointResolver, RawResponse, ResolvedCall, DEFAULT_ENDPOINT_TIMEOUT};
pub use error::{ChainError, TransportError};
pub use transport::{HttpTransport, RpcTransport};

/// Account and pool address type.
pub use alloy::primitives::Address;
