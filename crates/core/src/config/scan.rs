//! Scan runtime settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the per-endpoint timeout (seconds).
pub const ENV_RPC_TIMEOUT_SECS: &str = "SENTINEL_RPC_TIMEOUT_SECS";
/// Environment variable overriding how many chains are scanned at once.
pub const ENV_MAX_CONCURRENT_CHAINS: &str = "SENTINEL_MAX_CONCURRENT_CHAINS";

/// How a scan talks to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Per-endpoint request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Chains resolved concurrently. 1 = strictly sequential.
    /// Endpoints within one chain are always tried one at a time.
    #[serde(default = "default_max_concurrent_chains")]
    pub max_concurrent_chains: usize,
}

fn default_request_timeout_secs() -> u64 {
    10
}
fn default_max_concurrent_chains() -> usize {
    1
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_chains: default_max_concurrent_chains(),
        }
    }
}

impl ScanConfig {
    /// Get request timeout as Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Concurrency, never below 1.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_chains.max(1)
    }

    /// Apply `SENTINEL_*` environment overrides. Unparseable values are
    /// ignored with a warning.
    pub fn apply_env(mut self) -> Self {
        if let Some(v) = env_number(ENV_RPC_TIMEOUT_SECS) {
            self.request_timeout_secs = v;
        }
        if let Some(v) = env_number(ENV_MAX_CONCURRENT_CHAINS) {
            self.max_concurrent_chains = v;
        }
        self
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(
            request_timeout_secs = self.request_timeout_secs,
            max_concurrent_chains = self.max_concurrent_chains,
            "Scan configuration loaded"
        );
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
