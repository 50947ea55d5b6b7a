//! Chain balance sources
//!
//! One source per chain family. The aggregator looks sources up by chain
//! tag, asks each for the chain's whitelist and then for the raw balances of
//! the whitelisted tokens.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::assets::AssetCatalog;
use crate::error::BridgeResult;
use crate::types::{BalanceList, Chain, WhiteList};

pub mod evm;
pub mod secret;
pub mod terra;

pub use evm::EvmRpcSource;
pub use secret::SecretQuerySource;
pub use terra::TerraLcdSource;

/// Fetches whitelists and raw balances for one chain
#[async_trait]
pub trait BalanceSource: Send + Sync {
    fn chain(&self) -> Chain;

    /// Whitelist used for this chain; defaults to the catalog's
    async fn fetch_whitelist(&self, catalog: &AssetCatalog) -> BridgeResult<WhiteList> {
        Ok(catalog.whitelist(self.chain()))
    }

    /// Raw balances of `address` for every token in `whitelist`, keyed by
    /// token address
    async fn fetch_balances(&self, address: &str, whitelist: &WhiteList) -> BridgeResult<BalanceList>;
}

/// In-memory balances, for tests and offline runs
pub struct StaticBalanceSource {
    chain: Chain,
    balances: BalanceList,
    fetches: AtomicUsize,
}

impl StaticBalanceSource {
    pub fn new(chain: Chain, balances: BalanceList) -> Self {
        Self {
            chain,
            balances,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch_balances` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for StaticBalanceSource {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn fetch_balances(&self, _address: &str, whitelist: &WhiteList) -> BridgeResult<BalanceList> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(whitelist
            .values()
            .filter_map(|token| {
                self.balances
                    .get(token)
                    .map(|amount| (token.clone(), amount.clone()))
            })
            .collect())
    }
}
