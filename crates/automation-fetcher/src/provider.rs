//! AutomationReader - reconstruct automation positions for one network.
//!
//! This is the main entry point. It ties the resynchronizer, the decode
//! dispatcher and the merge engine together behind two queries.
//!
//! # Example
//!
//! ```ignore
//! use automation_fetcher::{AutomationReader, QueryOptions};
//! use automation_types::ChainId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = AutomationReader::from_rpc_url("https://eth.llamarpc.com", ChainId::Mainnet)
//!         .await?;
//!
//!     // Every position owned by these wallets, repay/boost legs combined
//!     let positions = reader
//!         .get_subscriptions_for(&[owner], &QueryOptions::merged())
//!         .await?;
//!     Ok(())
//! }
//! ```

use alloy_primitives::Address;
use anyhow::{Context, Result};
use automation_codec::NumericFormat;
use automation_transport::{BlockRef, ChainReader, JsonRpcClient, NetworkConfig};
use automation_types::{env_var, env_var_or, ChainId};
use chrono::Utc;
use tracing::{debug, info};

use crate::decoders::exchange::is_expired;
use crate::decoders::DecodeContext;
use crate::dispatch::dispatch_all;
use crate::error::AutomationError;
use crate::merge::merge_positions;
use crate::resync::{Resynchronizer, ScanRange, DEFAULT_AMENDMENT_CONCURRENCY};
use crate::types::{Position, QueryOptions};

/// Read-only view of the automation registry on one network.
///
/// Holds no per-query state; every query resolves its own snapshot block.
pub struct AutomationReader<R> {
    reader: R,
    network: NetworkConfig,
    /// `network.sub_storage`, validated at construction.
    registry: Address,
    format: NumericFormat,
    amendment_concurrency: usize,
    /// Used when a query does not set `log_span`.
    default_log_span: Option<u64>,
}

impl<R: ChainReader> AutomationReader<R> {
    /// Build without contacting the endpoint.
    ///
    /// Fails if the network has no registry address configured.
    pub fn new(reader: R, network: NetworkConfig) -> Result<Self, AutomationError> {
        let registry = network
            .sub_storage
            .ok_or(AutomationError::MissingRegistryAddress(network.chain))?;
        Ok(Self {
            reader,
            network,
            registry,
            format: NumericFormat::default(),
            amendment_concurrency: env_var_or(
                "AUTOMATION_AMENDMENT_CONCURRENCY",
                DEFAULT_AMENDMENT_CONCURRENCY,
            ),
            default_log_span: env_var("AUTOMATION_LOG_SPAN"),
        })
    }

    /// Build and check that the endpoint serves `network.chain`.
    pub async fn connect(reader: R, network: NetworkConfig) -> Result<Self> {
        let expected = network.chain.id();
        let actual = reader
            .chain_id()
            .await
            .context("Failed to query endpoint chain id")?;
        if actual != expected {
            return Err(AutomationError::ChainIdMismatch { expected, actual }.into());
        }
        Ok(Self::new(reader, network)?)
    }

    /// Build for whatever supported network the endpoint reports.
    pub async fn detect(reader: R) -> Result<Self> {
        let id = reader
            .chain_id()
            .await
            .context("Failed to query endpoint chain id")?;
        let chain = ChainId::from_id(id).ok_or(AutomationError::UnsupportedChain(id))?;
        Ok(Self::new(reader, NetworkConfig::from_env(chain))?)
    }

    pub fn with_numeric_format(mut self, format: NumericFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_amendment_concurrency(mut self, concurrency: usize) -> Self {
        self.amendment_concurrency = concurrency;
        self
    }

    pub fn with_default_log_span(mut self, span: Option<u64>) -> Self {
        self.default_log_span = span;
        self
    }

    pub fn chain(&self) -> ChainId {
        self.network.chain
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn chain_reader(&self) -> &R {
        &self.reader
    }

    /// Every position on the registry.
    pub async fn get_subscriptions(&self, options: &QueryOptions) -> Result<Vec<Position>> {
        self.query(None, options).await
    }

    /// Positions created by any of `owners`.
    pub async fn get_subscriptions_for(
        &self,
        owners: &[Address],
        options: &QueryOptions,
    ) -> Result<Vec<Position>> {
        if owners.is_empty() {
            return Ok(Vec::new());
        }
        self.query(Some(owners), options).await
    }

    async fn query(
        &self,
        owners: Option<&[Address]>,
        options: &QueryOptions,
    ) -> Result<Vec<Position>> {
        let chain_id = self.network.chain.id();
        let to_block = match options.to_block {
            BlockRef::Number(block) => block,
            BlockRef::Latest => self
                .reader
                .block_number()
                .await
                .context("Failed to resolve latest block")?,
        };
        let from_block = options.from_block.unwrap_or(self.network.deploy_block);
        if from_block > to_block {
            debug!(chain_id, from_block, to_block, "empty block range");
            return Ok(Vec::new());
        }

        let range = ScanRange::new(from_block, to_block)
            .with_log_span(options.log_span.or(self.default_log_span));
        let subscriptions =
            Resynchronizer::new(&self.reader, self.registry, self.network.multicall)
                .with_amendment_concurrency(self.amendment_concurrency)
                .resync(owners, &range)
                .await?;

        let ctx = DecodeContext {
            chain: self.network.chain,
            format: self.format,
        };
        let mut positions = dispatch_all(&subscriptions, &ctx)?;
        let decoded = positions.len();

        if options.enabled_only {
            positions.retain(|position| position.enabled);
        }
        if options.unexpired_only {
            let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
            positions.retain(|position| {
                !position
                    .good_until()
                    .is_some_and(|good_until| is_expired(good_until, now))
            });
        }
        if options.merge_subs {
            positions = merge_positions(positions);
        }

        info!(
            chain_id,
            block = to_block,
            owners = owners.map(<[Address]>::len),
            subscriptions = subscriptions.len(),
            decoded,
            positions = positions.len(),
            merged = options.merge_subs,
            "reconstructed automation positions"
        );
        Ok(positions)
    }
}

impl AutomationReader<JsonRpcClient> {
    /// Connect over JSON-RPC, with network configuration taken from the environment.
    pub async fn from_rpc_url(url: &str, chain: ChainId) -> Result<Self> {
        Self::connect(JsonRpcClient::new(url), NetworkConfig::from_env(chain)).await
    }
}
