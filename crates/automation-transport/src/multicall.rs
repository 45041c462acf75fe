//! Batch call executor.
//!
//! N read-only calls go out as one Multicall3 `aggregate3` `eth_call`, so every
//! result is observed at the same block. Failures are reported in-band per
//! call (`allowFailure = true`); only a failure of the outer call aborts.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{sol, SolCall};
use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::reader::{BlockRef, ChainReader};

sol! {
    struct Call3 {
        address target;
        bool allowFailure;
        bytes callData;
    }

    struct Call3Result {
        bool success;
        bytes returnData;
    }

    function aggregate3(Call3[] calls) external payable returns (Call3Result[] returnData);
}

/// One logical call in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCall {
    pub target: Address,
    pub input: Bytes,
}

impl BatchCall {
    pub fn new<C: SolCall>(target: Address, call: &C) -> Self {
        Self {
            target,
            input: Bytes::from(call.abi_encode()),
        }
    }

    /// Zero-address targets are placeholders and never reach the node.
    pub fn is_placeholder(&self) -> bool {
        self.target.is_zero()
    }
}

/// Executes batches through a Multicall3 deployment.
pub struct MulticallExecutor<'a, R: ?Sized> {
    reader: &'a R,
    multicall: Address,
}

impl<'a, R: ChainReader + ?Sized> MulticallExecutor<'a, R> {
    pub fn new(reader: &'a R, multicall: Address) -> Self {
        Self { reader, multicall }
    }

    /// Execute `calls` in one round-trip and return one slot per input call.
    ///
    /// A slot is `None` when the call targeted the zero address, reverted,
    /// or returned no data.
    pub async fn aggregate(
        &self,
        calls: &[BatchCall],
        block: BlockRef,
    ) -> Result<Vec<Option<Bytes>>> {
        let live: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| !call.is_placeholder())
            .map(|(i, _)| i)
            .collect();

        let mut slots = vec![None; calls.len()];
        if live.is_empty() {
            return Ok(slots);
        }

        let request = aggregate3Call {
            calls: live
                .iter()
                .map(|&i| Call3 {
                    target: calls[i].target,
                    allowFailure: true,
                    callData: calls[i].input.clone(),
                })
                .collect(),
        };

        debug!(
            calls = calls.len(),
            executed = live.len(),
            block = %block,
            "multicall aggregate3"
        );

        let raw = self
            .reader
            .call(self.multicall, Bytes::from(request.abi_encode()), block)
            .await
            .context("Multicall3 aggregate3 failed")?;
        let results = aggregate3Call::abi_decode_returns(&raw)
            .context("Failed to decode aggregate3 results")?;

        if results.len() != live.len() {
            return Err(anyhow!(
                "aggregate3 returned {} results for {} calls",
                results.len(),
                live.len()
            ));
        }

        for (index, result) in live.into_iter().zip(results) {
            if result.success && !result.returnData.is_empty() {
                slots[index] = Some(result.returnData);
            }
        }
        Ok(slots)
    }

    /// Like [`aggregate`](Self::aggregate), decoding each present slot with `C`'s return type.
    pub async fn aggregate_typed<C: SolCall>(
        &self,
        calls: &[(Address, C)],
        block: BlockRef,
    ) -> Result<Vec<Option<C::Return>>> {
        let batch: Vec<BatchCall> = calls
            .iter()
            .map(|(target, call)| BatchCall::new(*target, call))
            .collect();
        self.aggregate(&batch, block)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.map(|bytes| {
                    C::abi_decode_returns(&bytes)
                        .with_context(|| format!("Failed to decode result of call {}", i))
                })
                .transpose()
            })
            .collect()
    }
}
