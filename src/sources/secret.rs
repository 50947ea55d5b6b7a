//! SNIP-20 balances on Secret Network
//!
//! SNIP-20 balances are private: each query must carry the owner's viewing
//! key for that token. Queries are posted to a query gateway that handles
//! the enclave encryption; tokens with no viewing key are skipped.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::BalanceSource;
use crate::amount::Amount;
use crate::assets::{catalog::fetch_remote_whitelist, AssetCatalog};
use crate::error::{BridgeError, BridgeResult, ErrorCode};
use crate::types::{BalanceList, Chain, WhiteList};
use crate::utils::http;
use crate::{log_debug, log_warn};

#[derive(Debug, Serialize)]
struct BalanceQuery<'a> {
    address: &'a str,
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct QueryMsg<'a> {
    balance: BalanceQuery<'a>,
}

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    contract_address: &'a str,
    query: QueryMsg<'a>,
}

#[derive(Debug, Deserialize)]
struct BalanceAmount {
    amount: String,
}

#[derive(Debug, Deserialize)]
struct ViewingKeyError {
    msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Snip20Response {
    Balance(BalanceAmount),
    ViewingKeyError(ViewingKeyError),
}

/// Secret Network SNIP-20 balance source
pub struct SecretQuerySource {
    client: Client,
    query_url: String,
    /// token contract -> viewing key
    viewing_keys: HashMap<String, String>,
    whitelist_url: Option<String>,
}

impl SecretQuerySource {
    pub fn new(client: Client, query_url: impl Into<String>, viewing_keys: HashMap<String, String>) -> Self {
        Self {
            client,
            query_url: query_url.into(),
            viewing_keys,
            whitelist_url: None,
        }
    }

    pub fn with_whitelist_url(mut self, url: impl Into<String>) -> Self {
        self.whitelist_url = Some(url.into());
        self
    }

    async fn query_balance(&self, token: &str, owner: &str, key: &str) -> BridgeResult<Option<Amount>> {
        let request = GatewayRequest {
            contract_address: token,
            query: QueryMsg {
                balance: BalanceQuery { address: owner, key },
            },
        };
        let response: Snip20Response = http::post_json(&self.client, &self.query_url, &request).await?;
        interpret(response, token)
    }
}

/// A rejected viewing key is not fatal: the token just has no balance
fn interpret(response: Snip20Response, token: &str) -> BridgeResult<Option<Amount>> {
    match response {
        Snip20Response::Balance(b) => Amount::parse(&b.amount).map(Some).map_err(|e| {
            BridgeError::parse_error(format!("Bad SNIP-20 balance for {}", token)).with_details(e.to_string())
        }),
        Snip20Response::ViewingKeyError(err) => {
            log_warn!("secret", "Viewing key rejected", token = token, reason = err.msg);
            Ok(None)
        }
    }
}

#[async_trait]
impl BalanceSource for SecretQuerySource {
    fn chain(&self) -> Chain {
        Chain::Secret
    }

    async fn fetch_whitelist(&self, catalog: &AssetCatalog) -> BridgeResult<WhiteList> {
        match &self.whitelist_url {
            Some(url) => {
                let remote = fetch_remote_whitelist(&self.client, url).await?;
                Ok(catalog.whitelist_with_overlay(Chain::Secret, remote))
            }
            None => Ok(catalog.whitelist(Chain::Secret)),
        }
    }

    async fn fetch_balances(&self, address: &str, whitelist: &WhiteList) -> BridgeResult<BalanceList> {
        if !address.starts_with("secret1") {
            return Err(BridgeError::new(
                ErrorCode::InvalidAddress,
                "Secret balances need a secret1 address",
            ));
        }

        let mut balances = BalanceList::new();
        for token in whitelist.values() {
            let Some(key) = self.viewing_keys.get(token) else {
                log_debug!("secret", "No viewing key, skipping token", token = token);
                continue;
            };
            if let Some(amount) = self.query_balance(token, address, key).await? {
                balances.insert(token.clone(), amount);
            }
        }
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::build_client;
    use std::time::Duration;

    #[test]
    fn test_gateway_request_shape() {
        let request = GatewayRequest {
            contract_address: "secret1token",
            query: QueryMsg {
                balance: BalanceQuery {
                    address: "secret1owner",
                    key: "api_key_xyz",
                },
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contract_address"], "secret1token");
        assert_eq!(json["query"]["balance"]["address"], "secret1owner");
        assert_eq!(json["query"]["balance"]["key"], "api_key_xyz");
    }

    #[test]
    fn test_interpret_balance() {
        let response: Snip20Response = serde_json::from_str(r#"{"balance":{"amount":"2500000"}}"#).unwrap();
        assert_eq!(interpret(response, "secret1token").unwrap(), Some(Amount::from(2_500_000)));
    }

    #[test]
    fn test_interpret_viewing_key_error() {
        let response: Snip20Response =
            serde_json::from_str(r#"{"viewing_key_error":{"msg":"Wrong viewing key for this address or viewing key not set"}}"#)
                .unwrap();
        assert_eq!(interpret(response, "secret1token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_tokens_without_keys_are_skipped() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let source = SecretQuerySource::new(client, "https://gateway.invalid/query", HashMap::new());

        let mut whitelist = WhiteList::new();
        whitelist.insert("SCRT".to_string(), "secret1k0jntykt7e4g3y88ltc60czgjuqdy4c9e8fzek".to_string());

        // no viewing key -> no request, empty result
        let balances = source.fetch_balances("secret1owner", &whitelist).await.unwrap();
        assert!(balances.is_empty());
    }
}
