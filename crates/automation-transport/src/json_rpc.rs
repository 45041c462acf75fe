//! JSON-RPC client for EVM nodes.
//!
//! Uses a blocking `ureq` agent and hops onto the blocking thread pool for
//! each request, so async callers never stall the runtime on socket I/O.
//!
//! ## Configuration
//!
//! - `AUTOMATION_RPC_TIMEOUT_SECS` - request timeout (default: 30)
//! - `AUTOMATION_RPC_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use anyhow::{anyhow, Context, Result};
use automation_types::env_var_or;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::reader::{parse_quantity, BlockRef, ChainReader, LogQuery, RawLog};

/// An `error` object returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// HTTP JSON-RPC client.
#[derive(Clone)]
pub struct JsonRpcClient {
    endpoint: String,
    agent: ureq::Agent,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Request and connect timeouts, from `AUTOMATION_RPC_*_SECS` when set.
    fn env_timeouts() -> (Duration, Duration) {
        let timeout_secs = env_var_or("AUTOMATION_RPC_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = env_var_or(
            "AUTOMATION_RPC_CONNECT_TIMEOUT_SECS",
            Self::DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client with timeouts from the environment.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::env_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Client with fixed timeouts, ignoring the environment.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_blocking(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .with_context(|| format!("JSON-RPC request {} failed", method))?
            .into_json()
            .with_context(|| format!("Failed to parse JSON-RPC response for {}", method))?;

        parse_response(response)
    }

    /// Issue one request on the blocking pool.
    pub async fn request(&self, method: &'static str, params: Value) -> Result<Value> {
        debug!(method, endpoint = %self.endpoint, "json-rpc request");
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.request_blocking(method, params))
            .await
            .context("JSON-RPC worker task panicked")?
    }
}

/// Extract `result` from a JSON-RPC response envelope.
///
/// An `error` member becomes an [`RpcError`], untouched.
pub fn parse_response(mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(RpcError { code, message }.into());
    }
    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(anyhow!("No result in JSON-RPC response")),
    }
}

fn as_quantity(value: &Value) -> Result<u64> {
    let raw = value
        .as_str()
        .ok_or_else(|| anyhow!("expected hex quantity, got {}", value))?;
    parse_quantity(raw)
}

#[async_trait::async_trait]
impl ChainReader for JsonRpcClient {
    async fn chain_id(&self) -> Result<u64> {
        as_quantity(&self.request("eth_chainId", json!([])).await?)
    }

    async fn block_number(&self) -> Result<u64> {
        as_quantity(&self.request("eth_blockNumber", json!([])).await?)
    }

    async fn call(&self, to: Address, input: Bytes, block: BlockRef) -> Result<Bytes> {
        let params = json!([{ "to": to, "data": input }, block.to_rpc_param()]);
        let result = self.request("eth_call", params).await?;
        serde_json::from_value(result).context("eth_call returned non-hex data")
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>> {
        let result = self
            .request("eth_getLogs", json!([query.to_rpc_param()]))
            .await?;
        let logs: Vec<RawLog> =
            serde_json::from_value(result).context("Failed to decode eth_getLogs result")?;
        Ok(logs.into_iter().filter(|log| !log.removed).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result() {
        let value = parse_response(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"})).unwrap();
        assert_eq!(as_quantity(&value).unwrap(), 1);
    }

    #[test]
    fn test_parse_error_is_typed() {
        let err = parse_response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        }))
        .unwrap_err();
        let rpc = err.downcast_ref::<RpcError>().unwrap();
        assert_eq!(rpc.code, -32000);
        assert_eq!(rpc.message, "execution reverted");
    }

    #[test]
    fn test_null_error_is_ignored() {
        let value = parse_response(json!({"id": 1, "error": null, "result": []})).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_missing_result() {
        assert!(parse_response(json!({"id": 1})).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_error() {
        let client = JsonRpcClient::with_timeouts(
            "http://127.0.0.1:9",
            Duration::from_millis(200),
            Duration::from_millis(200),
        );
        let err = client.block_number().await.unwrap_err();
        assert!(err.to_string().contains("eth_blockNumber"));
        assert!(matches!(
            err.downcast_ref::<ureq::Error>(),
            Some(ureq::Error::Transport(_))
        ));
    }
}
