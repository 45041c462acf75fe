//! Shared types for the automation reader workspace.
//!
//! This crate holds the leaf types every other crate agrees on, so that the
//! codec, transport and fetcher crates never depend on each other just to
//! name a chain or a strategy.
//!
//! ## Modules
//!
//! - [`chain`]: the supported networks ([`ChainId`])
//! - [`ids`]: protocol and strategy identities ([`ProtocolId`], [`StrategyId`])
//! - [`strategies`]: static `(chain, isBundle, numericId)` → identity table
//! - [`assets`]: stable/volatile asset classification per chain
//! - [`env_utils`]: environment variable parsing for configuration

pub mod assets;
pub mod chain;
pub mod env_utils;
pub mod ids;
pub mod strategies;

pub use assets::is_stable_asset;
pub use chain::ChainId;
pub use env_utils::{env_string_or, env_var, env_var_or};
pub use ids::{ProtocolId, StrategyId};
pub use strategies::{lookup_strategy, StrategyEntry};
