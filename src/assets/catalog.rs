//! Asset catalog and per-chain whitelists

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::BridgeResult;
use crate::types::{Asset, Chain, WhiteList};
use crate::utils::http;
use crate::log_debug;

/// Native Terra denoms, bridged alongside CW20 tokens
pub fn default_native_denoms() -> WhiteList {
    [
        ("LUNA", "uluna"),
        ("UST", "uusd"),
        ("KRT", "ukrw"),
        ("SDT", "usdr"),
        ("MNT", "umnt"),
    ]
    .into_iter()
    .map(|(symbol, denom)| (symbol.to_string(), denom.to_string()))
    .collect()
}

/// Every asset the bridge knows about plus each chain's whitelist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default = "default_native_denoms")]
    pub native_denoms: WhiteList,
    #[serde(default)]
    pub whitelists: BTreeMap<Chain, WhiteList>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            native_denoms: default_native_denoms(),
            whitelists: BTreeMap::new(),
        }
    }
}

impl AssetCatalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }

    pub fn with_whitelist(mut self, chain: Chain, whitelist: WhiteList) -> Self {
        self.whitelists.insert(chain, whitelist);
        self
    }

    /// Effective whitelist of a chain
    ///
    /// The native ledger chain bridges its native denoms as well as its
    /// contract tokens; a contract entry wins when a symbol is in both.
    pub fn whitelist(&self, chain: Chain) -> WhiteList {
        let stored = self.whitelists.get(&chain);
        if chain.is_native_ledger() {
            let mut merged = self.native_denoms.clone();
            if let Some(tokens) = stored {
                merged.extend(tokens.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            merged
        } else {
            stored.cloned().unwrap_or_default()
        }
    }

    /// Effective whitelist of a chain with `remote` entries laid over it;
    /// a remote entry replaces a stored one for the same symbol
    pub fn whitelist_with_overlay(&self, chain: Chain, remote: WhiteList) -> WhiteList {
        let mut whitelist = self.whitelist(chain);
        whitelist.extend(remote);
        whitelist
    }

    pub fn find(&self, symbol: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }
}

/// Load a `{ "SYMBOL": "address" }` whitelist document
pub async fn fetch_remote_whitelist(client: &Client, url: &str) -> BridgeResult<WhiteList> {
    let whitelist: WhiteList = http::get_json(client, url).await?;
    log_debug!("catalog", "Loaded remote whitelist", url = url, entries = whitelist.len());
    Ok(whitelist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(entries: &[(&str, &str)]) -> WhiteList {
        entries
            .iter()
            .map(|(s, a)| (s.to_string(), a.to_string()))
            .collect()
    }

    #[test]
    fn test_native_ledger_merges_denoms() {
        let catalog = AssetCatalog::default().with_whitelist(
            Chain::Terra,
            whitelist(&[("MIR", "terra15gwkyepfc6xgca5t5zefzwy42uts8l2m4g40k6")]),
        );
        let wl = catalog.whitelist(Chain::Terra);
        assert_eq!(wl["LUNA"], "uluna");
        assert_eq!(wl["MIR"], "terra15gwkyepfc6xgca5t5zefzwy42uts8l2m4g40k6");
    }

    #[test]
    fn test_contract_entry_wins_over_denom() {
        let catalog = AssetCatalog::default()
            .with_whitelist(Chain::Terra, whitelist(&[("UST", "terra1override")]));
        assert_eq!(catalog.whitelist(Chain::Terra)["UST"], "terra1override");
    }

    #[test]
    fn test_other_chains_use_stored_whitelist_only() {
        let catalog = AssetCatalog::default();
        assert!(catalog.whitelist(Chain::Ethereum).is_empty());

        let catalog = catalog.with_whitelist(Chain::Bsc, whitelist(&[("UST", "0x23396cF899Ca06c4472205fC903bDB4de249D6fC")]));
        assert_eq!(catalog.whitelist(Chain::Bsc).len(), 1);
        assert!(!catalog.whitelist(Chain::Bsc).contains_key("LUNA"));
    }

    #[test]
    fn test_remote_overlay_wins() {
        let catalog = AssetCatalog::default()
            .with_whitelist(Chain::Ethereum, whitelist(&[("UST", "0xold"), ("ANC", "0xanc")]));
        let wl = catalog.whitelist_with_overlay(Chain::Ethereum, whitelist(&[("UST", "0xnew"), ("MIR", "0xmir")]));
        assert_eq!(wl["UST"], "0xnew");
        assert_eq!(wl["MIR"], "0xmir");
        assert_eq!(wl["ANC"], "0xanc");
        // the catalog itself is untouched
        assert_eq!(catalog.whitelist(Chain::Ethereum)["UST"], "0xold");
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog: AssetCatalog = serde_json::from_str(
            r#"{
                "assets": [{"symbol": "LUNA", "name": "Luna"}],
                "whitelists": {"ethereum": {"LUNA": "0xd2877702675e6cEb975b4A1dFf9fb7BAF4C91ea9"}}
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.find("LUNA").and_then(|a| a.name.as_deref()), Some("Luna"));
        assert_eq!(catalog.native_denoms["UST"], "uusd");
        assert_eq!(catalog.whitelist(Chain::Ethereum).len(), 1);
    }
}
