//! Chain table: which networks to scan, where their pools live, and which
//! RPC endpoints to try for each.

use std::collections::HashSet;

use alloy::primitives::{address, Address};
use sentinel_chain::parse_account;
use serde::Deserialize;

use crate::error::SentinelError;

/// One network to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Human-readable name (e.g., "Ethereum", "BNB Chain")
    pub name: String,
    /// EIP-155 chain ID
    pub chain_id: u64,
    /// RPC endpoints in priority order
    pub rpc_urls: Vec<String>,
    /// Aave v3 Pool address on this chain
    pub pool: Address,
}

/// Chain entry as written in a TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    pub name: String,
    pub chain_id: u64,
    pub rpc_urls: Vec<String>,
    pub pool: String,
}

impl ChainEntry {
    /// Expand `${VAR}` references in RPC URLs and parse the pool address.
    fn resolve(&self) -> Result<ChainConfig, SentinelError> {
        let pool = parse_account(&self.pool).map_err(|e| {
            SentinelError::Config(format!("chain {}: invalid pool address: {e}", self.name))
        })?;

        Ok(ChainConfig {
            name: self.name.clone(),
            chain_id: self.chain_id,
            rpc_urls: self.rpc_urls.iter().map(|u| expand_env(u)).collect(),
            pool,
        })
    }
}

struct BuiltinChain {
    name: &'static str,
    chain_id: u64,
    rpc_urls: &'static [&'static str],
    pool: Address,
}

/// Aave v3 deployments scanned when no config file is given.
const BUILTIN_CHAINS: &[BuiltinChain] = &[
    BuiltinChain {
        name: "Ethereum",
        chain_id: 1,
        rpc_urls: &["https://ethereum-rpc.publicnode.com", "https://eth.drpc.org"],
        pool: address!("87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2"),
    },
    BuiltinChain {
        name: "Polygon",
        chain_id: 137,
        rpc_urls: &["https://polygon.drpc.org", "https://polygon-bor-rpc.publicnode.com"],
        pool: address!("794a61358D6845594F94dc1DB02A252b5b4814aD"),
    },
    BuiltinChain {
        name: "Arbitrum",
        chain_id: 42161,
        rpc_urls: &["https://arb1.arbitrum.io/rpc", "https://arbitrum.drpc.org"],
        pool: address!("794a61358D6845594F94dc1DB02A252b5b4814aD"),
    },
    BuiltinChain {
        name: "Optimism",
        chain_id: 10,
        rpc_urls: &["https://mainnet.optimism.io", "https://optimism.drpc.org"],
        pool: address!("794a61358D6845594F94dc1DB02A252b5b4814aD"),
    },
    BuiltinChain {
        name: "Base",
        chain_id: 8453,
        rpc_urls: &["https://mainnet.base.org", "https://base.drpc.org"],
        pool: address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"),
    },
    BuiltinChain {
        name: "Avalanche",
        chain_id: 43114,
        rpc_urls: &["https://api.avax.network/ext/bc/C/rpc"],
        pool: address!("794a61358D6845594F94dc1DB02A252b5b4814aD"),
    },
    BuiltinChain {
        name: "Gnosis",
        chain_id: 100,
        rpc_urls: &["https://rpc.gnosischain.com"],
        pool: address!("b50201558B00496A145fE76f7424749556E326D8"),
    },
    BuiltinChain {
        name: "BNB Chain",
        chain_id: 56,
        rpc_urls: &["https://bsc-rpc.publicnode.com", "https://bsc.drpc.org"],
        pool: address!("6807dc923806fE8Fd134338EABCA509979a7e0cB"),
    },
    BuiltinChain {
        name: "Scroll",
        chain_id: 534352,
        rpc_urls: &["https://rpc.scroll.io"],
        pool: address!("11fCfe756c05AD438e312a7fd934381537D3cFfe"),
    },
];

/// Ordered, validated set of chains. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTable {
    chains: Vec<ChainConfig>,
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChainTable {
    /// The built-in Aave v3 deployments.
    pub fn builtin() -> Self {
        let chains = BUILTIN_CHAINS
            .iter()
            .map(|c| ChainConfig {
                name: c.name.to_string(),
                chain_id: c.chain_id,
                rpc_urls: c.rpc_urls.iter().map(|u| u.to_string()).collect(),
                pool: c.pool,
            })
            .collect();
        Self { chains }
    }

    /// Build a table from explicit chains, validating it.
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self, SentinelError> {
        let table = Self { chains };
        table.validate()?;
        Ok(table)
    }

    /// Build a table from config file entries.
    pub fn from_entries(entries: &[ChainEntry]) -> Result<Self, SentinelError> {
        let chains = entries
            .iter()
            .map(ChainEntry::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(chains)
    }

    /// Reject empty tables, chains without endpoints, and duplicate names.
    pub fn validate(&self) -> Result<(), SentinelError> {
        if self.chains.is_empty() {
            return Err(SentinelError::Config("chain table is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if chain.rpc_urls.is_empty() {
                return Err(SentinelError::Config(format!(
                    "chain {} has no RPC endpoints",
                    chain.name
                )));
            }
            if !seen.insert(chain.name.to_lowercase()) {
                return Err(SentinelError::Config(format!(
                    "duplicate chain name: {}",
                    chain.name
                )));
            }
        }

        Ok(())
    }

    /// Keep only the named chains (case-insensitive), preserving table order.
    ///
    /// An empty `names` list keeps every chain.
    pub fn filter<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, SentinelError> {
        if names.is_empty() {
            return Ok(self.clone());
        }

        let wanted: HashSet<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        for name in &wanted {
            if self.get(name).is_none() {
                return Err(SentinelError::Config(format!("unknown chain: {name}")));
            }
        }

        let chains = self
            .chains
            .iter()
            .filter(|c| wanted.contains(&c.name.to_lowercase()))
            .cloned()
            .collect();
        Ok(Self { chains })
    }

    /// Look up a chain by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.chains.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Expand ${VAR_NAME} patterns with environment variable values.
///
/// Unset variables are left as written.
pub(crate) fn expand_env(s: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return s.to_string();
    };

    let mut result = s.to_string();
    for cap in re.captures_iter(s) {
        if let (Some(full_match), Some(var_match)) = (cap.get(0), cap.get(1)) {
            if let Ok(value) = std::env::var(var_match.as_str()) {
                result = result.replace(full_match.as_str(), &value);
            }
        }
    }

    result
}
