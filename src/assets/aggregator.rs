//! Asset List Aggregation
//!
//! Builds the list of assets a user can send on a bridge route:
//! 1. resolve the source chain's whitelist
//! 2. fetch the user's balances for the whitelisted tokens
//! 3. attach addresses and balances to catalog entries
//! 4. mark assets the destination chain cannot receive

use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::AssetCatalog;
use super::store::AssetListStore;
use crate::error::BridgeResult;
use crate::sources::BalanceSource;
use crate::types::{Asset, AssetQuery, BalanceList, Chain, WhiteList};
use crate::{log_debug, log_error, log_info, log_warn};

// =============================================================================
// Pure Steps
// =============================================================================

/// Attach token addresses and balances to catalog entries
///
/// With no balances at all the catalog is returned untouched. Otherwise
/// only assets present in `whitelist` survive, each carrying its token
/// address and, when known, its raw balance.
pub fn merge_balances(assets: &[Asset], whitelist: &WhiteList, balances: &BalanceList) -> Vec<Asset> {
    if balances.is_empty() {
        return assets.to_vec();
    }

    assets
        .iter()
        .filter_map(|asset| {
            let token = whitelist.get(&asset.symbol).filter(|t| !t.is_empty())?;
            let mut merged = asset.clone();
            merged.token_address = Some(token.clone());
            merged.balance = balances.get(token).cloned();
            Some(merged)
        })
        .collect()
}

/// Whether a route needs the destination availability check
pub fn needs_destination_check(from: Chain, to: Chain) -> bool {
    from != to && !to.is_native_ledger()
}

/// Flag every asset that has no entry on the destination whitelist
pub fn mark_unavailable(assets: Vec<Asset>, destination: &WhiteList) -> Vec<Asset> {
    assets
        .into_iter()
        .map(|mut asset| {
            let available = destination
                .get(&asset.symbol)
                .map_or(false, |token| !token.is_empty());
            asset.disabled = Some(!available);
            asset
        })
        .collect()
}

// =============================================================================
// Aggregator
// =============================================================================

/// Computes asset lists from a catalog and per-chain balance sources
pub struct AssetAggregator {
    catalog: AssetCatalog,
    sources: HashMap<Chain, Arc<dyn BalanceSource>>,
}

impl AssetAggregator {
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            sources: HashMap::new(),
        }
    }

    /// Register a source under its chain, replacing any earlier one
    pub fn register(&mut self, source: Arc<dyn BalanceSource>) {
        let chain = source.chain();
        if self.sources.insert(chain, source).is_some() {
            log_debug!("aggregator", "Replaced balance source", chain = chain);
        }
    }

    pub fn with_source(mut self, source: Arc<dyn BalanceSource>) -> Self {
        self.register(source);
        self
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn has_source(&self, chain: Chain) -> bool {
        self.sources.contains_key(&chain)
    }

    /// Whitelist of `chain`, through its source when one is registered
    pub async fn resolve_whitelist(&self, chain: Chain) -> BridgeResult<WhiteList> {
        match self.sources.get(&chain) {
            Some(source) => source.fetch_whitelist(&self.catalog).await,
            None => Ok(self.catalog.whitelist(chain)),
        }
    }

    async fn load_balances(&self, query: &AssetQuery) -> BridgeResult<(WhiteList, BalanceList)> {
        let Some(user) = &query.user else {
            log_debug!("aggregator", "Logged out, skipping balance fetch", from = query.from);
            return Ok((WhiteList::new(), BalanceList::new()));
        };

        let Some(source) = self.sources.get(&query.from) else {
            log_warn!("aggregator", "No balance source registered", chain = query.from);
            return Ok((WhiteList::new(), BalanceList::new()));
        };

        if !user.wallet_type.supports(query.from) {
            log_warn!(
                "aggregator",
                "Wallet does not sign for source chain",
                chain = query.from,
                wallet = format!("{:?}", user.wallet_type)
            );
        }

        let whitelist = source.fetch_whitelist(&self.catalog).await?;
        let balances = source.fetch_balances(&user.address, &whitelist).await?;
        log_debug!(
            "aggregator",
            "Fetched balances",
            chain = query.from,
            address = user.address,
            tokens = whitelist.len(),
            balances = balances.len()
        );
        Ok((whitelist, balances))
    }

    /// Compute the asset list for one route and session
    pub async fn build_asset_list(&self, query: &AssetQuery) -> BridgeResult<Vec<Asset>> {
        let (whitelist, balances) = self.load_balances(query).await?;
        let assets = merge_balances(&self.catalog.assets, &whitelist, &balances);

        if !needs_destination_check(query.from, query.to) {
            return Ok(assets);
        }

        let destination = self.resolve_whitelist(query.to).await?;
        Ok(mark_unavailable(assets, &destination))
    }

    /// Recompute the asset list and publish it to `store`
    ///
    /// Returns `false` when a newer refresh started while this one was in
    /// flight; the result is then dropped. On error the store keeps its
    /// previous list.
    pub async fn get_asset_list(&self, store: &AssetListStore, query: &AssetQuery) -> BridgeResult<bool> {
        let ticket = store.begin_refresh();
        let assets = match self.build_asset_list(query).await {
            Ok(assets) => assets,
            Err(err) => {
                log_error!(
                    "aggregator",
                    "Asset list refresh failed",
                    from = query.from,
                    to = query.to,
                    error = err
                );
                return Err(err);
            }
        };
        let count = assets.len();
        let committed = store.commit(ticket, assets)?;
        if committed {
            log_info!(
                "aggregator",
                "Asset list updated",
                from = query.from,
                to = query.to,
                assets = count
            );
        }
        Ok(committed)
    }
}
