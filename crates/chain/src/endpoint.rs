//! Ordered endpoint fallback for read-only contract calls.
//!
//! Endpoints are tried strictly in configured order and the first usable
//! answer wins. Endpoints are never raced and answers are never compared.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::contracts::CallRequest;
use crate::error::ChainError;
use crate::transport::{EthCallRequest, JsonRpcResponse, RpcTransport};

/// Default per-endpoint request timeout.
pub const DEFAULT_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Results of this length or shorter (including `0x`) carry no return data.
const MIN_RESULT_LEN: usize = 10;

/// Hex result of a successful call, without the `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse(String);

impl RawResponse {
    /// Wrap a JSON-RPC `result` string if it carries data.
    ///
    /// Returns `None` for the `0x` "no data" sentinel and anything too short
    /// to hold a return word.
    pub fn from_result(result: &str) -> Option<Self> {
        if result == "0x" || result.len() <= MIN_RESULT_LEN {
            return None;
        }
        let digits = result.strip_prefix("0x").unwrap_or(result);
        Some(Self(digits.to_string()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

/// A successful call and the endpoint that answered it.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// URL that produced the answer
    pub endpoint: String,
    /// Position of that URL in the configured list
    pub endpoint_index: usize,
    pub response: RawResponse,
}

/// Runs one call against an ordered endpoint list.
#[derive(Clone)]
pub struct EndpointResolver {
    transport: Arc<dyn RpcTransport>,
    timeout: Duration,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for EndpointResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointResolver")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EndpointResolver {
    /// Create a resolver with the default 10s timeout.
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_ENDPOINT_TIMEOUT,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Set the per-endpoint timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Try `endpoints` in order until one returns data.
    ///
    /// Endpoint failures are logged and swallowed. Only when every endpoint
    /// fails does this return [`ChainError::ChainUnavailable`].
    pub async fn call(
        &self,
        chain: &str,
        endpoints: &[String],
        request: &CallRequest,
    ) -> Result<ResolvedCall, ChainError> {
        for (index, endpoint) in endpoints.iter().enumerate() {
            match self.try_endpoint(endpoint, request).await {
                Ok(response) => {
                    debug!(chain, endpoint = %endpoint, index, "Endpoint answered");
                    return Ok(ResolvedCall {
                        endpoint: endpoint.clone(),
                        endpoint_index: index,
                        response,
                    });
                }
                Err(e) => {
                    debug!(chain, endpoint = %endpoint, error = %e, "Endpoint failed, trying next");
                }
            }
        }

        warn!(chain, attempts = endpoints.len(), "No endpoint returned data");
        Err(ChainError::ChainUnavailable {
            chain: chain.to_string(),
            attempts: endpoints.len(),
        })
    }

    /// One bounded attempt against one endpoint.
    async fn try_endpoint(
        &self,
        endpoint: &str,
        request: &CallRequest,
    ) -> Result<RawResponse, ChainError> {
        let failure = |reason: String| ChainError::EndpointFailure {
            endpoint: endpoint.to_string(),
            reason,
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_value(EthCallRequest::latest(request, id))
            .map_err(|e| failure(e.to_string()))?;

        let reply = tokio::time::timeout(
            self.timeout,
            self.transport.post_json(endpoint, &body, self.timeout),
        )
        .await
        .map_err(|_| failure(format!("timed out after {:?}", self.timeout)))?
        .map_err(|e| failure(e.to_string()))?;

        let parsed: JsonRpcResponse =
            serde_json::from_value(reply).map_err(|e| failure(format!("malformed reply: {e}")))?;

        if let Some(response) = parsed.result.as_deref().and_then(RawResponse::from_result) {
            return Ok(response);
        }

        match parsed.error {
            Some(err) => Err(failure(format!("rpc error {}: {}", err.code, err.message))),
            None => Err(failure("empty result".to_string())),
        }
    }
}
