//! Event resynchronizer.
//!
//! The registry keeps only `{owner, enabled, hash}` per subscription; payloads
//! live in event logs. Reconstruction therefore runs in three steps against a
//! single snapshot block:
//!
//! 1. Read `Subscribe` logs (optionally filtered by owner) to get a candidate
//!    payload per `subId`.
//! 2. Read every candidate's canonical record in one Multicall3 batch.
//! 3. Candidates whose hash already matches are *fresh*. The rest are
//!    *amended*: their last `UpdateData` log supplies the current payload.
//!
//! Amendment lookups are independent and run concurrently, bounded by
//! `amendment_concurrency`.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use anyhow::{anyhow, Context, Result};
use automation_codec::sub_storage::{getSubCall, StoredSubData, Subscribe, UpdateData};
use automation_transport::{BlockRef, ChainReader, LogQuery, MulticallExecutor, RawLog};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use crate::types::Subscription;

/// Default number of amendment lookups in flight at once.
pub const DEFAULT_AMENDMENT_CONCURRENCY: usize = 8;

/// Inclusive block range scanned for registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub from_block: u64,
    /// Also the snapshot block for canonical reads.
    pub to_block: u64,
    /// Maximum blocks per `eth_getLogs` request. `None` means one request.
    pub log_span: Option<u64>,
}

impl ScanRange {
    pub fn new(from_block: u64, to_block: u64) -> Self {
        Self {
            from_block,
            to_block,
            log_span: None,
        }
    }

    pub fn with_log_span(mut self, span: Option<u64>) -> Self {
        self.log_span = span;
        self
    }

    /// Consecutive inclusive windows covering the range, ascending.
    pub fn windows(&self) -> Vec<(u64, u64)> {
        if self.from_block > self.to_block {
            return Vec::new();
        }
        let Some(span) = self.log_span else {
            return vec![(self.from_block, self.to_block)];
        };
        let span = span.max(1);
        let mut windows = Vec::new();
        let mut start = self.from_block;
        loop {
            let end = start.saturating_add(span - 1).min(self.to_block);
            windows.push((start, end));
            if end == self.to_block {
                break;
            }
            start = end + 1;
        }
        windows
    }
}

/// Where a candidate's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Fresh,
    Amended,
}

/// Reconciles registry events with canonical on-chain records.
pub struct Resynchronizer<'a, R: ?Sized> {
    reader: &'a R,
    registry: Address,
    multicall: Address,
    amendment_concurrency: usize,
}

impl<'a, R: ChainReader + ?Sized> Resynchronizer<'a, R> {
    pub fn new(reader: &'a R, registry: Address, multicall: Address) -> Self {
        Self {
            reader,
            registry,
            multicall,
            amendment_concurrency: DEFAULT_AMENDMENT_CONCURRENCY,
        }
    }

    pub fn with_amendment_concurrency(mut self, concurrency: usize) -> Self {
        self.amendment_concurrency = concurrency.max(1);
        self
    }

    /// Reconstruct every live subscription in `range`, ordered by `subId`.
    ///
    /// `owners = None` scans the whole registry. An empty owner slice matches
    /// nothing and performs no requests.
    pub async fn resync(
        &self,
        owners: Option<&[Address]>,
        range: &ScanRange,
    ) -> Result<Vec<Subscription>> {
        if owners.is_some_and(|owners| owners.is_empty()) {
            return Ok(Vec::new());
        }

        let candidates = self.creation_candidates(owners, range).await?;
        if candidates.is_empty() {
            debug!(
                from_block = range.from_block,
                to_block = range.to_block,
                "no Subscribe events in range"
            );
            return Ok(Vec::new());
        }

        let canonical = self.canonical_records(&candidates, range.to_block).await?;

        let mut live: BTreeMap<u64, (Subscription, StoredSubData, SyncState)> = BTreeMap::new();
        for ((sub_id, candidate), record) in candidates.into_iter().zip(canonical) {
            let Some(record) = record else {
                debug!(sub_id, block = range.to_block, "no canonical record, dropping");
                continue;
            };
            let state = if candidate.content_hash == record.strategySubHash {
                SyncState::Fresh
            } else {
                SyncState::Amended
            };
            live.insert(sub_id, (candidate, record, state));
        }

        let amended: Vec<u64> = live
            .iter()
            .filter(|(_, (_, _, state))| *state == SyncState::Amended)
            .map(|(sub_id, _)| *sub_id)
            .collect();
        debug!(
            candidates = live.len(),
            amended = amended.len(),
            block = range.to_block,
            "canonical records read"
        );

        let amendments: Vec<(u64, Option<(UpdateData, u64)>)> = stream::iter(amended)
            .map(move |sub_id| async move {
                let last = self.last_amendment(sub_id, range).await?;
                Ok::<_, anyhow::Error>((sub_id, last))
            })
            .buffer_unordered(self.amendment_concurrency)
            .try_collect()
            .await?;

        for (sub_id, last) in amendments {
            if let (Some((sub, _, _)), Some((event, block))) = (live.get_mut(&sub_id), last) {
                sub.overlay(event.subStruct, event.subHash, block);
            }
        }

        let mut subscriptions = Vec::with_capacity(live.len());
        for (sub_id, (mut sub, record, _)) in live {
            if sub.recompute_hash() != record.strategySubHash {
                warn!(
                    sub_id,
                    block = range.to_block,
                    "payload does not match canonical hash after resync, dropping"
                );
                continue;
            }
            sub.enabled = record.isEnabled;
            subscriptions.push(sub);
        }
        Ok(subscriptions)
    }

    async fn creation_candidates(
        &self,
        owners: Option<&[Address]>,
        range: &ScanRange,
    ) -> Result<BTreeMap<u64, Subscription>> {
        let mut query = LogQuery::new(
            self.registry,
            Subscribe::SIGNATURE_HASH,
            range.from_block,
            range.to_block,
        );
        if let Some(owners) = owners {
            query = query.with_topic(2, owners.iter().map(|owner| owner.into_word()).collect());
        }

        let mut candidates = BTreeMap::new();
        for log in self.fetch_logs(&query, range).await? {
            let event = Subscribe::decode_raw_log(log.topics.iter().copied(), &log.data)
                .with_context(|| {
                    format!(
                        "Failed to decode Subscribe log at block {} index {}",
                        log.block_number, log.log_index
                    )
                })?;
            let sub_id = sub_id_u64(event.subId)?;
            let payload = event.subStruct;
            candidates.insert(
                sub_id,
                Subscription {
                    sub_id,
                    owner: event.proxy,
                    strategy_or_bundle_id: payload.strategyOrBundleId,
                    is_bundle: payload.isBundle,
                    enabled: false,
                    trigger_data: payload.triggerData,
                    sub_data: payload.subData,
                    content_hash: event.subHash,
                    observed_at_block: log.block_number,
                },
            );
        }
        Ok(candidates)
    }

    /// One batch, one slot per candidate in `subId` order.
    async fn canonical_records(
        &self,
        candidates: &BTreeMap<u64, Subscription>,
        block: u64,
    ) -> Result<Vec<Option<StoredSubData>>> {
        let calls: Vec<(Address, getSubCall)> = candidates
            .keys()
            .map(|&sub_id| {
                (
                    self.registry,
                    getSubCall {
                        subId: U256::from(sub_id),
                    },
                )
            })
            .collect();
        MulticallExecutor::new(self.reader, self.multicall)
            .aggregate_typed(&calls, BlockRef::Number(block))
            .await
            .context("Failed to read canonical subscription records")
    }

    /// The most recent `UpdateData` for `sub_id` and the block it was emitted in.
    async fn last_amendment(
        &self,
        sub_id: u64,
        range: &ScanRange,
    ) -> Result<Option<(UpdateData, u64)>> {
        let query = LogQuery::new(
            self.registry,
            UpdateData::SIGNATURE_HASH,
            range.from_block,
            range.to_block,
        )
        .with_topic(1, vec![B256::from(U256::from(sub_id))]);

        let Some(log) = self
            .fetch_logs(&query, range)
            .await?
            .into_iter()
            .max_by_key(RawLog::position)
        else {
            debug!(sub_id, "hash mismatch but no UpdateData events");
            return Ok(None);
        };

        let event = UpdateData::decode_raw_log(log.topics.iter().copied(), &log.data)
            .with_context(|| format!("Failed to decode UpdateData log for sub {}", sub_id))?;
        debug!(sub_id, block = log.block_number, "applying amendment");
        Ok(Some((event, log.block_number)))
    }

    /// Run `query` over each window of `range` in ascending order.
    async fn fetch_logs(&self, query: &LogQuery, range: &ScanRange) -> Result<Vec<RawLog>> {
        let mut logs = Vec::new();
        for (from, to) in range.windows() {
            let window = query.with_range(from, to);
            let batch = self.reader.get_logs(&window).await.with_context(|| {
                format!("eth_getLogs failed for blocks {}..={}", from, to)
            })?;
            logs.extend(batch);
        }
        logs.sort_by_key(RawLog::position);
        Ok(logs)
    }
}

fn sub_id_u64(sub_id: U256) -> Result<u64> {
    u64::try_from(sub_id).map_err(|_| anyhow!("subId {} does not fit in u64", sub_id))
}
