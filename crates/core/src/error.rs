//! Errors that abort a whole scan.
//!
//! Per-endpoint and per-chain failures never reach this type; they are
//! contained in [`crate::ChainOutcome`].

use sentinel_chain::ChainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentinelError {
    /// Account address rejected before any network activity.
    #[error("invalid address `{input}`: {reason}")]
    InvalidAddress { input: String, reason: &'static str },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Chain(ChainError),
}

impl From<ChainError> for SentinelError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidAddress { input, reason } => Self::InvalidAddress { input, reason },
            other => Self::Chain(other),
        }
    }
}

impl From<toml::de::Error> for SentinelError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
