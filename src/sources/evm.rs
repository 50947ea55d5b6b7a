//! ERC-20 balances over EVM JSON-RPC (Ethereum, BSC)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::BalanceSource;
use crate::amount::Amount;
use crate::assets::{catalog::fetch_remote_whitelist, AssetCatalog};
use crate::error::{BridgeError, BridgeResult, ErrorCode};
use crate::types::{BalanceList, Chain, WhiteList};
use crate::utils::http;
use crate::{log_debug, log_warn};

/// `balanceOf(address)` selector
const BALANCE_OF_SELECTOR: &str = "70a08231";

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

/// JSON-RPC balance source for one EVM chain
pub struct EvmRpcSource {
    chain: Chain,
    client: Client,
    rpc_url: String,
    whitelist_url: Option<String>,
}

impl EvmRpcSource {
    pub fn new(chain: Chain, client: Client, rpc_url: impl Into<String>) -> BridgeResult<Self> {
        if !chain.is_ether_base() {
            return Err(BridgeError::unsupported_chain(format!(
                "{} is not an EVM chain",
                chain.display_name()
            )));
        }
        Ok(Self {
            chain,
            client,
            rpc_url: rpc_url.into(),
            whitelist_url: None,
        })
    }

    /// Overlay a remotely published whitelist on the catalog's
    pub fn with_whitelist_url(mut self, url: impl Into<String>) -> Self {
        self.whitelist_url = Some(url.into());
        self
    }

    async fn balance_of(&self, token: &str, owner: &str) -> BridgeResult<Amount> {
        let payload = balance_of_call(token, owner);
        let response: RpcResponse = http::post_json(&self.client, &self.rpc_url, &payload).await?;
        parse_rpc_response(response, token)
    }
}

/// Is this a `0x` + 40 hex digit address
pub fn is_evm_address(address: &str) -> bool {
    address.len() == 42
        && (address.starts_with("0x") || address.starts_with("0X"))
        && address[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// `eth_call` payload for `token.balanceOf(owner)`
fn balance_of_call(token: &str, owner: &str) -> Value {
    let data = format!(
        "0x{}{:0>64}",
        BALANCE_OF_SELECTOR,
        owner[2..].to_ascii_lowercase()
    );
    json!({
        "jsonrpc": "2.0",
        "method": "eth_call",
        "params": [{ "to": token, "data": data }, "latest"],
        "id": 1
    })
}

fn parse_rpc_response(response: RpcResponse, token: &str) -> BridgeResult<Amount> {
    if let Some(err) = response.error {
        return Err(BridgeError::provider_error(format!("eth_call failed for {}", token))
            .with_details(format!("{}: {}", err.code, err.message)));
    }
    let result = response
        .result
        .ok_or_else(|| BridgeError::parse_error(format!("eth_call for {} returned no result", token)))?;
    Ok(Amount::from_hex(&result)?)
}

#[async_trait]
impl BalanceSource for EvmRpcSource {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn fetch_whitelist(&self, catalog: &AssetCatalog) -> BridgeResult<WhiteList> {
        match &self.whitelist_url {
            Some(url) => {
                let remote = fetch_remote_whitelist(&self.client, url).await?;
                Ok(catalog.whitelist_with_overlay(self.chain, remote))
            }
            None => Ok(catalog.whitelist(self.chain)),
        }
    }

    async fn fetch_balances(&self, address: &str, whitelist: &WhiteList) -> BridgeResult<BalanceList> {
        if !is_evm_address(address) {
            return Err(BridgeError::new(
                ErrorCode::InvalidAddress,
                format!("{} balances need a 0x address", self.chain.display_name()),
            ));
        }

        let mut balances = BalanceList::new();
        for (symbol, token) in whitelist {
            if !is_evm_address(token) {
                log_warn!("evm", "Skipping non-contract whitelist entry", symbol = symbol, token = token);
                continue;
            }
            let amount = self.balance_of(token, address).await?;
            balances.insert(token.clone(), amount);
        }

        log_debug!(
            "evm",
            "Fetched balances",
            chain = self.chain,
            address = address,
            count = balances.len()
        );
        Ok(balances)
    }
}
