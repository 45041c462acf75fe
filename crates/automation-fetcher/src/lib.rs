//! Automation position reconstruction.
//!
//! Rebuilds the current state of on-chain automation subscriptions from the
//! registry's event logs and canonical records, decodes each into a
//! strategy-shaped [`Position`], and optionally merges repay/boost legs into
//! single leverage-management positions.
//!
//! # Pipeline
//!
//! ```text
//! Subscribe logs ──► candidates ──► getSub batch ──► fresh / amended
//!                                                        │
//!                               UpdateData logs ◄────────┘ (amended only)
//!                                       │
//!                                       ▼
//!                 dispatch (identity table + decoder) ──► Position
//!                                       │
//!                                       ▼
//!                              merge (opt-in) ──► Vec<Position>
//! ```
//!
//! ## Modules
//!
//! - [`provider`]: [`AutomationReader`], the query entry point
//! - [`resync`]: event/canonical-record reconciliation
//! - [`dispatch`]: identity lookup and decoder invocation
//! - [`decoders`]: one decoder per supported `(protocol, strategy)`
//! - [`merge`]: positional pairing of compound positions
//! - [`types`]: [`Subscription`], [`Position`], [`QueryOptions`]
//! - [`error`]: [`AutomationError`]

pub mod decoders;
pub mod dispatch;
pub mod error;
pub mod merge;
pub mod provider;
pub mod resync;
pub mod types;

pub use decoders::{DecodeContext, DecodeError};
pub use dispatch::{dispatch, dispatch_all};
pub use error::AutomationError;
pub use merge::merge_positions;
pub use provider::AutomationReader;
pub use resync::{Resynchronizer, ScanRange};
pub use types::{MergeLeg, Position, QueryOptions, Subscription};
