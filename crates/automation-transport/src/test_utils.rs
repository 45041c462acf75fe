//! Scripted in-memory chain for tests.
//!
//! [`ScriptedChainReader`] plays the part of a node hosting the subscription
//! registry and Multicall3: it answers `aggregate3` batches of `getSub` calls
//! from a canonical-record table, serves registry event logs filtered by
//! [`LogQuery`], and records every request so tests can assert on round-trips.
//!
//! # Example
//!
//! ```ignore
//! let chain = ScriptedChainReader::new(1, registry);
//! chain.subscribe(U256::from(0), owner, &sub, 100);
//! chain.update(U256::from(0), &amended, 120);
//! let positions = reader.get_subscriptions(QueryOptions::default()).await?;
//! assert_eq!(chain.log_queries().len(), 2);
//! ```

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolType};
use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use automation_codec::sub_storage::{
    content_hash, getSubCall, StoredSubData, StrategySub, Subscribe, UpdateData,
};

use crate::multicall::{aggregate3Call, Call3Result};
use crate::network::MULTICALL3_ADDRESS;
use crate::reader::{BlockRef, ChainReader, LogQuery, RawLog};

/// One `eth_call` as seen by the scripted node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: Address,
    pub block: BlockRef,
    /// Number of inner calls when `to` is Multicall3.
    pub batch_size: Option<usize>,
}

#[derive(Default)]
struct State {
    canonical: BTreeMap<U256, StoredSubData>,
    logs: Vec<RawLog>,
    calls: Vec<RecordedCall>,
    log_queries: Vec<LogQuery>,
    fail_calls: bool,
    fail_logs: bool,
}

/// In-memory registry node.
pub struct ScriptedChainReader {
    chain_id: u64,
    head: u64,
    registry: Address,
    state: Mutex<State>,
}

impl ScriptedChainReader {
    pub fn new(chain_id: u64, registry: Address) -> Self {
        Self {
            chain_id,
            head: 20_000_000,
            registry,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_head(mut self, head: u64) -> Self {
        self.head = head;
        self
    }

    /// Overwrite the canonical record for `sub_id`.
    pub fn set_canonical(&self, sub_id: U256, owner: Address, enabled: bool, hash: B256) {
        self.state.lock().canonical.insert(
            sub_id,
            StoredSubData {
                walletAddr: owner.0,
                isEnabled: enabled,
                strategySubHash: hash,
            },
        );
    }

    pub fn set_enabled(&self, sub_id: U256, enabled: bool) {
        if let Some(record) = self.state.lock().canonical.get_mut(&sub_id) {
            record.isEnabled = enabled;
        }
    }

    /// Make `getSub(sub_id)` revert.
    pub fn remove_canonical(&self, sub_id: U256) {
        self.state.lock().canonical.remove(&sub_id);
    }

    /// Emit `Subscribe` at `block` and record the matching canonical entry.
    pub fn subscribe(&self, sub_id: U256, owner: Address, sub: &StrategySub, block: u64) -> B256 {
        let hash = self.subscribe_event_only(sub_id, owner, sub, block);
        self.set_canonical(sub_id, owner, true, hash);
        hash
    }

    /// Emit `Subscribe` without touching canonical state.
    pub fn subscribe_event_only(
        &self,
        sub_id: U256,
        owner: Address,
        sub: &StrategySub,
        block: u64,
    ) -> B256 {
        let hash = content_hash(sub);
        let event = Subscribe {
            subId: sub_id,
            proxy: owner,
            subHash: hash,
            subStruct: sub.clone(),
        };
        let topics = vec![
            Subscribe::SIGNATURE_HASH,
            B256::from(sub_id),
            owner.into_word(),
            hash,
        ];
        self.push_log(topics, event.encode_data(), block);
        hash
    }

    /// Emit `UpdateData` at `block` and move the canonical hash to the new payload.
    pub fn update(&self, sub_id: U256, sub: &StrategySub, block: u64) -> B256 {
        let hash = self.update_event_only(sub_id, sub, block);
        if let Some(record) = self.state.lock().canonical.get_mut(&sub_id) {
            record.strategySubHash = hash;
        }
        hash
    }

    /// Emit `UpdateData` without touching canonical state.
    pub fn update_event_only(&self, sub_id: U256, sub: &StrategySub, block: u64) -> B256 {
        let hash = content_hash(sub);
        let event = UpdateData {
            subId: sub_id,
            subHash: hash,
            subStruct: sub.clone(),
        };
        let topics = vec![UpdateData::SIGNATURE_HASH, B256::from(sub_id), hash];
        self.push_log(topics, event.encode_data(), block);
        hash
    }

    fn push_log(&self, topics: Vec<B256>, data: Vec<u8>, block: u64) {
        let mut state = self.state.lock();
        let log_index = state
            .logs
            .iter()
            .filter(|log| log.block_number == block)
            .count() as u64;
        state.logs.push(RawLog {
            address: self.registry,
            topics,
            data: Bytes::from(data),
            block_number: block,
            log_index,
            removed: false,
        });
    }

    /// Make every subsequent `eth_call` fail at the transport level.
    pub fn fail_calls(&self, fail: bool) {
        self.state.lock().fail_calls = fail;
    }

    /// Make every subsequent `eth_getLogs` fail at the transport level.
    pub fn fail_logs(&self, fail: bool) {
        self.state.lock().fail_logs = fail;
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn log_queries(&self) -> Vec<LogQuery> {
        self.state.lock().log_queries.clone()
    }

    /// Log queries for one event signature.
    pub fn log_queries_for(&self, event: B256) -> Vec<LogQuery> {
        self.log_queries()
            .into_iter()
            .filter(|query| query.event == event)
            .collect()
    }

    pub fn clear_recordings(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.log_queries.clear();
    }

    fn answer_registry(
        state: &State,
        registry: Address,
        target: Address,
        input: &[u8],
    ) -> Call3Result {
        let reverted = Call3Result {
            success: false,
            returnData: Bytes::new(),
        };
        if target != registry {
            return reverted;
        }
        let Ok(call) = getSubCall::abi_decode(input) else {
            return reverted;
        };
        match state.canonical.get(&call.subId) {
            Some(record) => Call3Result {
                success: true,
                returnData: Bytes::from(StoredSubData::abi_encode(record)),
            },
            None => reverted,
        }
    }
}

#[async_trait::async_trait]
impl ChainReader for ScriptedChainReader {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.head)
    }

    async fn call(&self, to: Address, input: Bytes, block: BlockRef) -> Result<Bytes> {
        let mut state = self.state.lock();
        if state.fail_calls {
            return Err(anyhow!("scripted transport failure"));
        }

        if to == MULTICALL3_ADDRESS {
            let request = aggregate3Call::abi_decode(&input)
                .map_err(|e| anyhow!("bad aggregate3 calldata: {}", e))?;
            state.calls.push(RecordedCall {
                to,
                block,
                batch_size: Some(request.calls.len()),
            });
            let results: Vec<Call3Result> = request
                .calls
                .iter()
                .map(|call| {
                    Self::answer_registry(&state, self.registry, call.target, &call.callData)
                })
                .collect();
            let encoded = <alloy_sol_types::sol_data::Array<Call3Result>>::abi_encode(&results);
            return Ok(Bytes::from(encoded));
        }

        state.calls.push(RecordedCall {
            to,
            block,
            batch_size: None,
        });
        let result = Self::answer_registry(&state, self.registry, to, &input);
        if result.success {
            Ok(result.returnData)
        } else {
            Err(anyhow!("execution reverted"))
        }
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<RawLog>> {
        let mut state = self.state.lock();
        if state.fail_logs {
            return Err(anyhow!("scripted transport failure"));
        }
        state.log_queries.push(query.clone());
        let mut logs: Vec<RawLog> = state
            .logs
            .iter()
            .filter(|log| query.matches(log))
            .cloned()
            .collect();
        logs.sort_by_key(RawLog::position);
        Ok(logs)
    }
}
