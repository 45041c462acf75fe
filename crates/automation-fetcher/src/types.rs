//! Core types for subscription reconstruction.
//!
//! A [`Subscription`] is a registry entry as reconciled from events and the
//! canonical on-chain record. A [`Position`] is what callers see: one decoded
//! subscription, or two merged legs of a compound automation.

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, B256};
use automation_codec::sub_storage::{content_hash, StrategySub};
use automation_transport::BlockRef;
use automation_types::{ChainId, ProtocolId, StrategyId};
use serde::Serialize;
use serde_json::Value;

/// A registry entry with its authoritative current payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub sub_id: u64,
    /// Wallet that created the subscription. Never changed by amendments.
    pub owner: Address,
    pub strategy_or_bundle_id: u64,
    pub is_bundle: bool,
    /// From the canonical record, not from any event.
    pub enabled: bool,
    pub trigger_data: Vec<Bytes>,
    pub sub_data: Vec<B256>,
    pub content_hash: B256,
    /// Block of the event that supplied the current payload.
    pub observed_at_block: u64,
}

impl Subscription {
    pub fn strategy_sub(&self) -> StrategySub {
        StrategySub::new(
            self.strategy_or_bundle_id,
            self.is_bundle,
            self.trigger_data.clone(),
            self.sub_data.clone(),
        )
    }

    /// Hash of the payload as currently held, independent of `content_hash`.
    pub fn recompute_hash(&self) -> B256 {
        content_hash(&self.strategy_sub())
    }

    /// Replace everything but the owner with an amendment payload.
    pub fn overlay(&mut self, sub: StrategySub, hash: B256, block: u64) {
        self.strategy_or_bundle_id = sub.strategyOrBundleId;
        self.is_bundle = sub.isBundle;
        self.trigger_data = sub.triggerData;
        self.sub_data = sub.subData;
        self.content_hash = hash;
        self.observed_at_block = block;
    }
}

/// Which half of a compound position a subscription provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeLeg {
    /// Repay-style leg.
    Primary,
    /// Boost-style leg.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl From<ProtocolId> for ProtocolInfo {
    fn from(protocol: ProtocolId) -> Self {
        Self {
            id: protocol.full_id(),
            name: protocol.name().to_string(),
            slug: protocol.slug().to_string(),
            version: protocol.version().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInfo {
    /// Numeric id as registered on-chain.
    pub strategy_or_bundle_id: u64,
    /// Display id; may differ from what `strategy_or_bundle_id` maps to.
    pub strategy_id: StrategyId,
    pub is_bundle: bool,
    pub protocol: ProtocolInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedData {
    pub trigger_data: Vec<Bytes>,
    pub sub_data: Vec<B256>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedData {
    pub trigger: Value,
    pub sub_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyData {
    pub encoded: EncodedData,
    pub decoded: DecodedData,
}

/// Caller-facing reconstruction of one or two subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub chain_id: u64,
    pub owner: Address,
    pub enabled: bool,
    pub block_number: u64,
    pub sub_hash: B256,
    pub position_id: String,
    pub sub_id: u64,
    /// Set only when merging was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_ids: Option<Vec<u64>>,
    pub protocol: ProtocolInfo,
    pub strategy: StrategyInfo,
    pub strategy_data: StrategyData,
    pub specific: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_leg: Option<MergeLeg>,
}

impl Position {
    /// Skeleton carrying identity and the raw payload, before any decoding.
    pub fn base(
        sub: &Subscription,
        chain: ChainId,
        protocol: ProtocolId,
        strategy: StrategyId,
    ) -> Self {
        let protocol_info = ProtocolInfo::from(protocol);
        Self {
            chain_id: chain.id(),
            owner: sub.owner,
            enabled: sub.enabled,
            block_number: sub.observed_at_block,
            sub_hash: sub.content_hash,
            position_id: position_id(chain, protocol, sub.owner),
            sub_id: sub.sub_id,
            sub_ids: None,
            protocol: protocol_info.clone(),
            strategy: StrategyInfo {
                strategy_or_bundle_id: sub.strategy_or_bundle_id,
                strategy_id: strategy,
                is_bundle: sub.is_bundle,
                protocol: protocol_info,
            },
            strategy_data: StrategyData {
                encoded: EncodedData {
                    trigger_data: sub.trigger_data.clone(),
                    sub_data: sub.sub_data.clone(),
                },
                decoded: DecodedData::default(),
            },
            specific: BTreeMap::new(),
            merge_leg: None,
        }
    }

    /// Payload this position was decoded from, as submitted to the registry.
    pub fn strategy_sub(&self) -> StrategySub {
        StrategySub::new(
            self.strategy.strategy_or_bundle_id,
            self.strategy.is_bundle,
            self.strategy_data.encoded.trigger_data.clone(),
            self.strategy_data.encoded.sub_data.clone(),
        )
    }

    /// Expiry timestamp for strategies that carry one.
    pub fn good_until(&self) -> Option<u64> {
        self.specific.get("goodUntil").and_then(Value::as_u64)
    }
}

/// `{chainId}-{protocolSlug}-{owner}`, owner in lower-case hex.
pub fn position_id(chain: ChainId, protocol: ProtocolId, owner: Address) -> String {
    format!("{}-{}-{:#x}", chain.id(), protocol.slug(), owner)
}

/// Per-query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Combine repay/boost legs into single positions.
    pub merge_subs: bool,
    pub enabled_only: bool,
    /// Drop limit orders whose `goodUntil` has passed.
    pub unexpired_only: bool,
    /// Defaults to the registry deployment block.
    pub from_block: Option<u64>,
    pub to_block: BlockRef,
    /// Maximum blocks per `eth_getLogs` window. Defaults to `AUTOMATION_LOG_SPAN`.
    pub log_span: Option<u64>,
}

impl QueryOptions {
    pub fn merged() -> Self {
        Self {
            merge_subs: true,
            ..Self::default()
        }
    }

    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge_subs = merge;
        self
    }

    pub fn enabled_only(mut self, enabled_only: bool) -> Self {
        self.enabled_only = enabled_only;
        self
    }

    pub fn unexpired_only(mut self, unexpired_only: bool) -> Self {
        self.unexpired_only = unexpired_only;
        self
    }

    pub fn at_block(mut self, block: BlockRef) -> Self {
        self.to_block = block;
        self
    }

    pub fn from_block(mut self, block: u64) -> Self {
        self.from_block = Some(block);
        self
    }

    pub fn with_log_span(mut self, span: u64) -> Self {
        self.log_span = Some(span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn subscription() -> Subscription {
        Subscription {
            sub_id: 3,
            owner: address!("abcdef0000000000000000000000000000000001"),
            strategy_or_bundle_id: 5,
            is_bundle: true,
            enabled: true,
            trigger_data: vec![Bytes::from(vec![1u8; 32])],
            sub_data: vec![B256::with_last_byte(9)],
            content_hash: B256::ZERO,
            observed_at_block: 100,
        }
    }

    #[test]
    fn test_position_id_is_lowercase() {
        let sub = subscription();
        let id = position_id(ChainId::Mainnet, ProtocolId::AaveV3, sub.owner);
        assert_eq!(id, "1-aave-0xabcdef0000000000000000000000000000000001");
    }

    #[test]
    fn test_overlay_keeps_owner() {
        let mut sub = subscription();
        let owner = sub.owner;
        let replacement = StrategySub::new(4, true, vec![], vec![B256::with_last_byte(1)]);
        let hash = content_hash(&replacement);
        sub.overlay(replacement, hash, 250);

        assert_eq!(sub.owner, owner);
        assert_eq!(sub.strategy_or_bundle_id, 4);
        assert_eq!(sub.observed_at_block, 250);
        assert_eq!(sub.recompute_hash(), hash);
    }

    #[test]
    fn test_position_payload_matches_subscription() {
        let sub = subscription();
        let position =
            Position::base(&sub, ChainId::Mainnet, ProtocolId::AaveV3, StrategyId::Boost);
        assert_eq!(content_hash(&position.strategy_sub()), sub.recompute_hash());
    }

    #[test]
    fn test_base_position_serializes_camel_case() {
        let position = Position::base(
            &subscription(),
            ChainId::Mainnet,
            ProtocolId::AaveV3,
            StrategyId::Boost,
        );
        let value = serde_json::to_value(&position).unwrap();
        assert_eq!(value["chainId"], 1);
        assert_eq!(value["strategy"]["strategyId"], "boost");
        assert_eq!(value["strategy"]["strategyOrBundleId"], 5);
        assert_eq!(value["protocol"]["id"], "Aave__V3");
        assert!(value.get("subIds").is_none());
        assert!(value.get("mergeLeg").is_none());
        assert!(value["strategyData"]["encoded"]["triggerData"].is_array());
    }
}
