//! Chain reader abstraction.
//!
//! Everything the reconstruction pipeline needs from a node fits in four
//! reads. Implementations include the HTTP [`JsonRpcClient`](crate::JsonRpcClient)
//! and, for tests, the scripted reader in `test_utils`.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

/// Block to execute a read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockRef {
    #[default]
    Latest,
    Number(u64),
}

impl BlockRef {
    /// JSON-RPC block parameter (`"latest"` or a hex quantity).
    pub fn to_rpc_param(self) -> Value {
        match self {
            BlockRef::Latest => Value::String("latest".to_string()),
            BlockRef::Number(n) => Value::String(format!("{:#x}", n)),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Latest => f.write_str("latest"),
            BlockRef::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<u64> for BlockRef {
    fn from(n: u64) -> Self {
        BlockRef::Number(n)
    }
}

/// Filter on one indexed topic position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    Any,
    OneOf(Vec<B256>),
}

impl TopicFilter {
    pub fn matches(&self, topic: Option<&B256>) -> bool {
        match self {
            TopicFilter::Any => true,
            TopicFilter::OneOf(values) => topic.is_some_and(|t| values.contains(t)),
        }
    }

    fn to_rpc_param(&self) -> Value {
        match self {
            TopicFilter::Any => Value::Null,
            TopicFilter::OneOf(values) if values.len() == 1 => json!(values[0]),
            TopicFilter::OneOf(values) => json!(values),
        }
    }
}

/// An `eth_getLogs` request for one event of one contract over an inclusive block range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    /// Event signature hash (topic0).
    pub event: B256,
    /// Filters for topic1..topic3.
    pub topics: [TopicFilter; 3],
    pub from_block: u64,
    pub to_block: u64,
}

impl LogQuery {
    pub fn new(address: Address, event: B256, from_block: u64, to_block: u64) -> Self {
        Self {
            address,
            event,
            topics: Default::default(),
            from_block,
            to_block,
        }
    }

    /// Restrict indexed topic `position` (1-based, as in the event signature).
    pub fn with_topic(mut self, position: usize, values: Vec<B256>) -> Self {
        if let Some(slot) = position
            .checked_sub(1)
            .and_then(|i| self.topics.get_mut(i))
        {
            *slot = TopicFilter::OneOf(values);
        }
        self
    }

    /// Same query over a different block window.
    pub fn with_range(&self, from_block: u64, to_block: u64) -> Self {
        Self {
            from_block,
            to_block,
            ..self.clone()
        }
    }

    pub fn matches(&self, log: &RawLog) -> bool {
        log.address == self.address
            && log.topics.first() == Some(&self.event)
            && log.block_number >= self.from_block
            && log.block_number <= self.to_block
            && self
                .topics
                .iter()
                .enumerate()
                .all(|(i, filter)| filter.matches(log.topics.get(i + 1)))
    }

    /// JSON-RPC filter object. Trailing wildcard topics are omitted.
    pub fn to_rpc_param(&self) -> Value {
        let mut topics = vec![json!(self.event)];
        topics.extend(self.topics.iter().map(TopicFilter::to_rpc_param));
        while topics.last().is_some_and(Value::is_null) {
            topics.pop();
        }
        json!({
            "address": self.address,
            "topics": topics,
            "fromBlock": format!("{:#x}", self.from_block),
            "toBlock": format!("{:#x}", self.to_block),
        })
    }
}

/// A log record as returned by `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(deserialize_with = "quantity")]
    pub block_number: u64,
    #[serde(deserialize_with = "quantity")]
    pub log_index: u64,
    #[serde(default)]
    pub removed: bool,
}

impl RawLog {
    /// Total emission order within a chain.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// Parse a JSON-RPC hex quantity (`"0x1a"`).
pub fn parse_quantity(raw: &str) -> Result<u64> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| anyhow!("quantity {:?} is missing the 0x prefix", raw))?;
    u64::from_str_radix(digits, 16).map_err(|e| anyhow!("invalid quantity {:?}: {}", raw, e))
}

fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_quantity(&raw).map_err(serde::de::Error::custom)
}

/// Read-only chain access.
///
/// Implementations surface transport failures as-is and never retry.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// `eth_chainId` of the connected endpoint.
    async fn chain_id(&self) -> Result<u64>;

    /// Current head block number.
    async fn block_number(&self) -> Result<u64>;

    /// `eth_call` against `to` at `block`, returning the raw return data.
    async fn call(&self, to: Address, input: Bytes, block: BlockRef) -> Result<Bytes>;

    /// `eth_getLogs` for a single query window.
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>>;
}

#[async_trait::async_trait]
impl<T: ChainReader + ?Sized> ChainReader for Arc<T> {
    async fn chain_id(&self) -> Result<u64> {
        (**self).chain_id().await
    }

    async fn block_number(&self) -> Result<u64> {
        (**self).block_number().await
    }

    async fn call(&self, to: Address, input: Bytes, block: BlockRef) -> Result<Bytes> {
        (**self).call(to, input, block).await
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>> {
        (**self).get_logs(query).await
    }
}
