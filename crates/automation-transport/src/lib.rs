//! Automation Transport Layer
//!
//! Read-only chain access for the automation reader.
//!
//! This crate provides:
//! - [`reader`]: the [`ChainReader`] trait and its request/response types
//! - [`json_rpc`]: blocking HTTP JSON-RPC client driven from async code
//! - [`network`]: per-network contract addresses and registry deployment blocks
//! - [`multicall`]: the batch call executor built on Multicall3 `aggregate3`
//! - `test_utils` (feature `test-utils`): a scripted in-memory [`ChainReader`]
//!
//! # Example
//!
//! ```ignore
//! use automation_transport::{JsonRpcClient, ChainReader, BlockRef};
//!
//! let client = JsonRpcClient::new("https://eth.llamarpc.com");
//! let head = client.block_number().await?;
//! let raw = client.call(target, calldata, BlockRef::Number(head)).await?;
//! ```

pub mod json_rpc;
pub mod multicall;
pub mod network;
pub mod reader;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use json_rpc::{JsonRpcClient, RpcError};
pub use multicall::{BatchCall, MulticallExecutor};
pub use network::{NetworkConfig, MULTICALL3_ADDRESS};
pub use reader::{BlockRef, ChainReader, LogQuery, RawLog, TopicFilter};
