//! Error types for the chain interaction layer.

use thiserror::Error;

/// Errors raised while talking to a pool contract on one chain.
///
/// Only [`ChainError::InvalidAddress`] is fatal to a scan. Everything else is
/// contained to the endpoint or chain that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Account address is not 20 bytes of hex.
    #[error("invalid address `{input}`: {reason}")]
    InvalidAddress { input: String, reason: &'static str },

    /// One endpoint failed; the caller falls through to the next one.
    #[error("endpoint {endpoint} failed: {reason}")]
    EndpointFailure { endpoint: String, reason: String },

    /// Every endpoint configured for the chain failed or returned no data.
    #[error("no endpoint for {chain} returned data ({attempts} tried)")]
    ChainUnavailable { chain: String, attempts: usize },

    /// Response is shorter than the six 32-byte slots of `getUserAccountData`.
    #[error("response truncated: {len} hex chars, expected at least {expected}")]
    TruncatedResponse { len: usize, expected: usize },

    /// Response has the right length but is not valid hex.
    #[error("failed to decode response: {0}")]
    DecodeFailure(String),
}

/// Failures at the HTTP transport boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
