//! Bridge configuration
//!
//! Loaded from a JSON file, then overridden from the environment:
//!
//! | Variable                  | Field              |
//! |---------------------------|--------------------|
//! | `BRIDGE_TERRA_LCD_URL`    | `terra_lcd_url`    |
//! | `BRIDGE_ETHEREUM_RPC_URL` | `ethereum_rpc_url` |
//! | `BRIDGE_BSC_RPC_URL`      | `bsc_rpc_url`      |
//! | `BRIDGE_SECRET_QUERY_URL` | `secret_query_url` |
//! | `BRIDGE_TIMEOUT_SECS`     | `request_timeout_secs` |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::assets::{AssetAggregator, AssetCatalog};
use crate::error::{BridgeError, BridgeResult};
use crate::sources::{EvmRpcSource, SecretQuerySource, TerraLcdSource};
use crate::types::Chain;
use crate::utils::{http, require_endpoint};
use crate::{log_debug, log_warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub terra_lcd_url: Option<String>,
    pub ethereum_rpc_url: Option<String>,
    pub bsc_rpc_url: Option<String>,
    pub secret_query_url: Option<String>,
    /// Remote whitelist documents overlaid on the catalog, per chain
    pub whitelist_urls: BTreeMap<Chain, String>,
    pub request_timeout_secs: u64,
    /// SNIP-20 contract -> viewing key
    pub secret_viewing_keys: HashMap<String, String>,
    pub catalog: AssetCatalog,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            terra_lcd_url: None,
            ethereum_rpc_url: None,
            bsc_rpc_url: None,
            secret_query_url: None,
            whitelist_urls: BTreeMap::new(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            secret_viewing_keys: HashMap::new(),
            catalog: AssetCatalog::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| BridgeError::invalid_config("Malformed configuration").with_details(e.to_string()))
    }

    /// Read a JSON config file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::invalid_config(format!("Cannot read {}", path.display())).with_details(e.to_string())
        })?;
        let mut config = Self::from_json(&json)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> BridgeResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> BridgeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("BRIDGE_TERRA_LCD_URL") {
            self.terra_lcd_url = Some(url);
        }
        if let Some(url) = get("BRIDGE_ETHEREUM_RPC_URL") {
            self.ethereum_rpc_url = Some(url);
        }
        if let Some(url) = get("BRIDGE_BSC_RPC_URL") {
            self.bsc_rpc_url = Some(url);
        }
        if let Some(url) = get("BRIDGE_SECRET_QUERY_URL") {
            self.secret_query_url = Some(url);
        }
        if let Some(secs) = get("BRIDGE_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                BridgeError::invalid_config(format!("BRIDGE_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check every configured endpoint
    pub fn validate(&self) -> BridgeResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(BridgeError::invalid_config("request_timeout_secs must be positive"));
        }
        for (name, url) in self.endpoints() {
            require_endpoint(name, url)?;
        }
        for (chain, url) in &self.whitelist_urls {
            require_endpoint(chain.as_str(), url)?;
        }
        Ok(())
    }

    fn endpoints(&self) -> impl Iterator<Item = (&'static str, &String)> + '_ {
        [
            ("terra_lcd_url", self.terra_lcd_url.as_ref()),
            ("ethereum_rpc_url", self.ethereum_rpc_url.as_ref()),
            ("bsc_rpc_url", self.bsc_rpc_url.as_ref()),
            ("secret_query_url", self.secret_query_url.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.map(|u| (name, u)))
    }

    /// Aggregator with one network source per configured endpoint
    pub fn build_aggregator(&self) -> BridgeResult<AssetAggregator> {
        self.validate()?;
        let client = http::build_client(self.timeout())?;
        let mut aggregator = AssetAggregator::new(self.catalog.clone());

        if let Some(url) = &self.terra_lcd_url {
            let url = require_endpoint("terra_lcd_url", url)?;
            aggregator.register(Arc::new(TerraLcdSource::new(client.clone(), url)));
            if self.whitelist_urls.contains_key(&Chain::Terra) {
                log_warn!("config", "Remote whitelist is not supported for the native ledger, ignoring");
            }
        }

        for (chain, configured) in [
            (Chain::Ethereum, &self.ethereum_rpc_url),
            (Chain::Bsc, &self.bsc_rpc_url),
        ] {
            let Some(url) = configured else { continue };
            let url = require_endpoint(chain.as_str(), url)?;
            let mut source = EvmRpcSource::new(chain, client.clone(), url)?;
            if let Some(list_url) = self.whitelist_urls.get(&chain) {
                source = source.with_whitelist_url(list_url.clone());
            }
            aggregator.register(Arc::new(source));
        }

        if let Some(url) = &self.secret_query_url {
            let url = require_endpoint("secret_query_url", url)?;
            let mut source = SecretQuerySource::new(client.clone(), url, self.secret_viewing_keys.clone());
            if let Some(list_url) = self.whitelist_urls.get(&Chain::Secret) {
                source = source.with_whitelist_url(list_url.clone());
            }
            aggregator.register(Arc::new(source));
        }

        log_debug!(
            "config",
            "Aggregator ready",
            sources = Chain::all().iter().filter(|c| aggregator.has_source(**c)).count(),
            assets = self.catalog.assets.len()
        );
        Ok(aggregator)
    }
}
