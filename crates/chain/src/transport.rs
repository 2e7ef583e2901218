//! JSON-RPC transport boundary.
//!
//! The endpoint resolver only needs "POST this JSON to that URL and give me
//! the JSON back". [`RpcTransport`] is that seam; [`HttpTransport`] is the
//! reqwest-backed implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::contracts::CallRequest;
use crate::error::TransportError;

/// Sends one JSON body to one URL and returns the parsed JSON reply.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, TransportError>;
}

/// HTTP transport over a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        trace!(url, "POST json-rpc");

        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout)
                } else {
                    TransportError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidJson(e.to_string()))
    }
}

/// `eth_call` request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct EthCallRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: (CallObject, &'a str),
    pub id: u64,
}

/// Transaction object of an `eth_call`.
#[derive(Debug, Clone, Serialize)]
pub struct CallObject {
    pub to: String,
    pub data: String,
}

impl<'a> EthCallRequest<'a> {
    /// Build an `eth_call` against the latest block.
    pub fn latest(request: &CallRequest, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "eth_call",
            params: (
                CallObject {
                    to: request.to.to_string(),
                    data: request.data_hex(),
                },
                "latest",
            ),
            id,
        }
    }
}

/// JSON-RPC reply. Either `result` or `error` is set by a well-behaved node.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Scripted in-memory transport for tests.
#[cfg(any(test, feature = "test-util"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned reply for one URL.
    #[derive(Debug, Clone)]
    pub enum Reply {
        /// `{"result": <hex>}`
        Result(String),
        /// `{"error": {...}}`
        RpcError(i64, String),
        /// Non-2xx status
        Status(u16),
        /// Body that is not a JSON-RPC object
        Garbage,
        /// Never answers within any reasonable timeout
        Hang,
        /// Arbitrary JSON body, returned as is
        Raw(Value),
    }

    /// Transport that answers from a URL → reply table and records every call.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the reply for `url`. Unscripted URLs fail with status 503.
        pub fn reply(mut self, url: impl Into<String>, reply: Reply) -> Self {
            self.replies.insert(url.into(), reply);
            self
        }

        /// URLs called so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Number of times `url` was called.
        pub fn call_count(&self, url: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == url).count()
        }
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &str,
            body: &Value,
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(url.to_string());
            }
            let id = body.get("id").cloned().unwrap_or(Value::from(1));

            match self.replies.get(url).cloned() {
                Some(Reply::Result(hex)) => Ok(serde_json::json!({
                    "jsonrpc": "2.0", "id": id, "result": hex,
                })),
                Some(Reply::RpcError(code, message)) => Ok(serde_json::json!({
                    "jsonrpc": "2.0", "id": id,
                    "error": { "code": code, "message": message },
                })),
                Some(Reply::Status(status)) => Err(TransportError::Status(status)),
                Some(Reply::Garbage) => Ok(Value::from("<html>bad gateway</html>")),
                Some(Reply::Raw(value)) => Ok(value),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(TransportError::Timeout(Duration::from_secs(3600)))
                }
                None => Err(TransportError::Status(503)),
            }
        }
    }
}
