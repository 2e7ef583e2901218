//! Multichain position resolution.
//!
//! For each configured chain: ordered endpoint fallback, then decode. Chains
//! are independent; a failure on one never stops the others. Ordering of the
//! final result happens only once every chain has finished.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use futures::stream::{self, StreamExt};
use sentinel_chain::{
    decode_account_data, encode_account_data_call, parse_account, CallRequest, EndpointResolver,
    RpcTransport,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::aggregator::ScanResult;
use crate::config::{ChainConfig, ChainTable, SentinelConfig};
use crate::error::SentinelError;
use crate::position::Position;

/// Cooperative cancellation for a scan.
///
/// Checked before each chain starts. A chain already in flight runs to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct ScanCancel(Arc<AtomicBool>);

impl ScanCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal state of one chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainStatus {
    /// Account holds collateral or debt here.
    Found {
        endpoint: String,
        #[serde(skip_serializing)]
        position: Box<Position>,
    },
    /// Pool answered, account holds nothing.
    NoPosition { endpoint: String },
    /// No endpoint returned data.
    Unavailable { reason: String },
    /// An endpoint returned data that did not decode.
    DecodeFailed { endpoint: String, reason: String },
    /// Scan was cancelled before this chain started.
    Skipped,
}

/// Outcome of resolving one chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainOutcome {
    pub chain: String,
    pub chain_id: u64,
    #[serde(flatten)]
    pub status: ChainStatus,
}

impl ChainOutcome {
    fn new(chain: &ChainConfig, status: ChainStatus) -> Self {
        Self {
            chain: chain.name.clone(),
            chain_id: chain.chain_id,
            status,
        }
    }

    /// The resolved position, if this chain has one.
    pub fn position(&self) -> Option<&Position> {
        match &self.status {
            ChainStatus::Found { position, .. } => Some(position.as_ref()),
            _ => None,
        }
    }

    pub fn into_position(self) -> Option<Position> {
        match self.status {
            ChainStatus::Found { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Resolves an account's positions across every chain in the table.
#[derive(Debug, Clone)]
pub struct PositionResolver {
    chains: ChainTable,
    endpoints: EndpointResolver,
    concurrency: usize,
}

impl PositionResolver {
    /// Create a resolver over `chains`, scanning one chain at a time.
    pub fn new(chains: ChainTable, endpoints: EndpointResolver) -> Self {
        Self {
            chains,
            endpoints,
            concurrency: 1,
        }
    }

    /// Create a resolver from loaded configuration.
    pub fn from_config(config: &SentinelConfig, transport: Arc<dyn RpcTransport>) -> Self {
        let endpoints =
            EndpointResolver::new(transport).with_timeout(config.scan.request_timeout());
        Self::new(config.chains.clone(), endpoints).with_concurrency(config.scan.concurrency())
    }

    /// Resolve up to `n` chains at once. Endpoint order within a chain is
    /// unaffected.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Validate `account`, resolve every chain, and aggregate.
    ///
    /// Fails only on an invalid address; that check happens before any
    /// network call.
    pub async fn scan(
        &self,
        account: &str,
        cancel: &ScanCancel,
    ) -> Result<ScanResult, SentinelError> {
        let account = parse_account(account)?;
        let outcomes = self.resolve(account, cancel).await;
        let result = ScanResult::from_outcomes(account, outcomes);

        info!(
            account = %account,
            positions = result.positions.len(),
            total_collateral_usd = result.totals.collateral_usd,
            total_debt_usd = result.totals.debt_usd,
            "Scan complete"
        );
        Ok(result)
    }

    /// Resolve every chain, returning outcomes in table order.
    #[instrument(skip(self, account, cancel), fields(account = %account, chains = self.chains.len()))]
    pub async fn resolve(&self, account: Address, cancel: &ScanCancel) -> Vec<ChainOutcome> {
        let calldata = encode_account_data_call(account);

        stream::iter(self.chains.iter())
            .map(|chain| {
                let calldata = calldata.clone();
                async move {
                    if cancel.is_cancelled() {
                        debug!(chain = %chain.name, "Scan cancelled, skipping chain");
                        return ChainOutcome::new(chain, ChainStatus::Skipped);
                    }
                    self.resolve_chain(chain, calldata).await
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Resolve one chain: fallback across its endpoints, then decode.
    pub async fn resolve_chain(&self, chain: &ChainConfig, calldata: Bytes) -> ChainOutcome {
        let request = CallRequest::new(chain.pool, calldata);

        let resolved = match self.endpoints.call(&chain.name, &chain.rpc_urls, &request).await {
            Ok(resolved) => resolved,
            Err(e) => {
                return ChainOutcome::new(
                    chain,
                    ChainStatus::Unavailable {
                        reason: e.to_string(),
                    },
                );
            }
        };

        let status = match decode_account_data(resolved.response.as_hex()) {
            Ok(Some(account)) => {
                let position = Position::new(chain, account);
                debug!(
                    chain = %chain.name,
                    chain_id = chain.chain_id,
                    collateral_usd = position.collateral_usd(),
                    debt_usd = position.debt_usd(),
                    health_factor = %position.health_factor(),
                    "Position found"
                );
                ChainStatus::Found {
                    endpoint: resolved.endpoint,
                    position: Box::new(position),
                }
            }
            Ok(None) => {
                debug!(chain = %chain.name, "No position");
                ChainStatus::NoPosition {
                    endpoint: resolved.endpoint,
                }
            }
            Err(e) => {
                warn!(chain = %chain.name, endpoint = %resolved.endpoint, error = %e, "Failed to decode account data");
                ChainStatus::DecodeFailed {
                    endpoint: resolved.endpoint,
                    reason: e.to_string(),
                }
            }
        };

        ChainOutcome::new(chain, status)
    }
}
