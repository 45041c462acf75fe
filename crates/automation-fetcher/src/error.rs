//! Error taxonomy for reconstruction queries.
//!
//! Configuration errors are raised at construction. Everything else fails the
//! whole query; unknown ids and vanished subscriptions are not errors at all
//! and never reach this type.

use automation_types::{ChainId, ProtocolId, StrategyId};
use thiserror::Error;

use crate::decoders::DecodeError;

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    #[error("no subscription registry address configured for {0}")]
    MissingRegistryAddress(ChainId),

    #[error("endpoint reports chain id {actual}, expected {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("no decoder registered for {protocol} / {strategy}")]
    MissingDecoder {
        protocol: ProtocolId,
        strategy: StrategyId,
    },

    #[error("failed to decode subscription {sub_id}")]
    Codec {
        sub_id: u64,
        #[source]
        source: DecodeError,
    },
}
