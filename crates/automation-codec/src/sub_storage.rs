//! Registry (SubStorage) ABI and canonical content hash.
//!
//! The registry never stores payload bytes in contract storage. It keeps only
//! `{walletAddr, isEnabled, strategySubHash}` per `subId`, and the payload
//! itself lives in `Subscribe` / `UpdateData` event logs. The hash is
//! `keccak256(abi.encode(StrategySub))`, which is what lets a reader tell a
//! stale event payload from the current one.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_sol_types::{sol, SolType};

sol! {
    /// Subscription payload as submitted to the registry.
    #[derive(Debug, PartialEq, Eq)]
    struct StrategySub {
        uint64 strategyOrBundleId;
        bool isBundle;
        bytes[] triggerData;
        bytes32[] subData;
    }

    /// Canonical on-chain record for a `subId`.
    #[derive(Debug, PartialEq, Eq)]
    struct StoredSubData {
        bytes20 walletAddr;
        bool isEnabled;
        bytes32 strategySubHash;
    }

    /// Creation event.
    #[derive(Debug)]
    event Subscribe(uint256 indexed subId, address indexed proxy, bytes32 indexed subHash, StrategySub subStruct);

    /// Amendment event. Replaces the whole payload; the owner is not repeated.
    #[derive(Debug)]
    event UpdateData(uint256 indexed subId, bytes32 indexed subHash, StrategySub subStruct);

    function getSub(uint256 subId) external view returns (StoredSubData memory);
}

impl StrategySub {
    pub fn new(
        strategy_or_bundle_id: u64,
        is_bundle: bool,
        trigger_data: Vec<Bytes>,
        sub_data: Vec<B256>,
    ) -> Self {
        Self {
            strategyOrBundleId: strategy_or_bundle_id,
            isBundle: is_bundle,
            triggerData: trigger_data,
            subData: sub_data,
        }
    }
}

impl StoredSubData {
    pub fn wallet(&self) -> Address {
        Address::from(self.walletAddr)
    }
}

/// Canonical content hash of a subscription payload.
pub fn content_hash(sub: &StrategySub) -> B256 {
    keccak256(StrategySub::abi_encode(sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, U256};
    use alloy_sol_types::SolEvent;

    fn sample() -> StrategySub {
        StrategySub::new(
            4,
            true,
            vec![Bytes::from(vec![0xab; 128])],
            vec![B256::from(U256::from(150u64)), B256::ZERO],
        )
    }

    #[test]
    fn test_encoding_matches_single_struct_abi_encode() {
        let encoded = StrategySub::abi_encode(&sample());
        // abi.encode(struct) with dynamic members starts with the 0x20 offset word
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32u64));
        assert_eq!(encoded.len() % 32, 0);
    }

    #[test]
    fn test_content_hash_tracks_every_field() {
        let base = sample();
        let hash = content_hash(&base);
        assert_eq!(hash, content_hash(&sample()));

        let mut flipped = sample();
        flipped.isBundle = false;
        assert_ne!(hash, content_hash(&flipped));

        let mut reworded = sample();
        reworded.subData[1] = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        assert_ne!(hash, content_hash(&reworded));
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            Subscribe::SIGNATURE,
            "Subscribe(uint256,address,bytes32,(uint64,bool,bytes[],bytes32[]))"
        );
        assert_eq!(
            UpdateData::SIGNATURE_HASH,
            keccak256("UpdateData(uint256,bytes32,(uint64,bool,bytes[],bytes32[]))")
        );
    }
}
