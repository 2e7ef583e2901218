//! Configuration for the position scanner.
//!
//! This module provides:
//! - Chain table (networks, pool addresses, ordered RPC endpoints)
//! - Scan settings (timeouts, cross-chain concurrency)
//! - A loader combining an optional TOML file with environment overrides
//!
//! Config file layout (every section optional):
//!
//! ```toml
//! [scan]
//! request_timeout_secs = 10
//! max_concurrent_chains = 1
//!
//! [[chains]]
//! name = "Ethereum"
//! chain_id = 1
//! rpc_urls = ["https://eth.example/${API_KEY}", "https://eth.drpc.org"]
//! pool = "0x87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2"
//! ```

mod chain;
mod scan;

pub use chain::{ChainConfig, ChainEntry, ChainTable};
pub use scan::{ScanConfig, ENV_MAX_CONCURRENT_CHAINS, ENV_RPC_TIMEOUT_SECS};

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::SentinelError;

/// Environment variable naming a config file when none is passed explicitly.
pub const ENV_CONFIG_PATH: &str = "SENTINEL_CONFIG";

/// Fully loaded configuration. Immutable for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct SentinelConfig {
    pub chains: ChainTable,
    pub scan: ScanConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scan: ScanConfig,
    #[serde(default)]
    chains: Vec<ChainEntry>,
}

impl SentinelConfig {
    /// Parse a TOML config. A file without `[[chains]]` keeps the built-in table.
    pub fn from_toml_str(content: &str) -> Result<Self, SentinelError> {
        let file: ConfigFile = toml::from_str(content)?;
        let chains = if file.chains.is_empty() {
            ChainTable::builtin()
        } else {
            ChainTable::from_entries(&file.chains)?
        };
        Ok(Self {
            chains,
            scan: file.scan,
        })
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SentinelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SentinelError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration for a run.
    ///
    /// Source order: `path` if given, else `$SENTINEL_CONFIG`, else built-in
    /// defaults. `SENTINEL_*` scan overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, SentinelError> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        let source = path.map(Path::to_path_buf).or_else(|| env_path.map(Into::into));

        let mut config = match &source {
            Some(p) => {
                info!(path = %p.display(), "Loading configuration file");
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.scan = config.scan.apply_env();

        info!(
            chains = config.chains.len(),
            source = source.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".to_string()),
            "Chain table loaded"
        );
        Ok(config)
    }
}
