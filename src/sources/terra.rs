//! Terra balances through the LCD REST API
//!
//! Native denoms (`uluna`, `uusd`, ...) come from one bank query; CW20 tokens
//! need one contract store query each.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::BalanceSource;
use crate::amount::Amount;
use crate::error::{BridgeError, BridgeResult};
use crate::types::{BalanceList, Chain, WhiteList};
use crate::utils::http;
use crate::{log_debug, log_warn};

const CW20_PREFIX: &str = "terra1";

#[derive(Debug, Deserialize)]
struct Coin {
    denom: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct BankBalancesResponse {
    balances: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct Cw20Balance {
    balance: String,
}

#[derive(Debug, Deserialize)]
struct StoreResponse {
    query_result: Cw20Balance,
}

/// Terra LCD balance source
pub struct TerraLcdSource {
    client: Client,
    lcd_url: String,
}

impl TerraLcdSource {
    pub fn new(client: Client, lcd_url: impl Into<String>) -> Self {
        Self {
            client,
            lcd_url: lcd_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn bank_url(&self, address: &str) -> String {
        format!("{}/cosmos/bank/v1beta1/balances/{}", self.lcd_url, address)
    }

    fn cw20_query_url(&self, token: &str, address: &str) -> BridgeResult<String> {
        let query = serde_json::json!({ "balance": { "address": address } });
        let encoded = STANDARD.encode(serde_json::to_vec(&query)?);

        let mut url = Url::parse(&format!(
            "{}/terra/wasm/v1beta1/contracts/{}/store",
            self.lcd_url, token
        ))?;
        url.query_pairs_mut().append_pair("query_msg", &encoded);
        Ok(url.to_string())
    }

    async fn fetch_native(&self, address: &str, denoms: &[&String]) -> BridgeResult<BalanceList> {
        if denoms.is_empty() {
            return Ok(BalanceList::new());
        }
        let response: BankBalancesResponse = http::get_json(&self.client, &self.bank_url(address)).await?;
        collect_native(response, denoms)
    }

    async fn fetch_cw20(&self, address: &str, token: &str) -> BridgeResult<Amount> {
        let url = self.cw20_query_url(token, address)?;
        let response: StoreResponse = http::get_json(&self.client, &url).await?;
        Amount::parse(&response.query_result.balance).map_err(|e| {
            BridgeError::parse_error(format!("Bad CW20 balance for {}", token)).with_details(e.to_string())
        })
    }
}

/// Keep only whitelisted denoms; the bank query omits denoms with no coins,
/// so those are absent rather than zero
fn collect_native(response: BankBalancesResponse, denoms: &[&String]) -> BridgeResult<BalanceList> {
    let mut balances = BalanceList::new();
    for coin in response.balances {
        if denoms.iter().any(|d| **d == coin.denom) {
            let amount = Amount::parse(&coin.amount).map_err(|e| {
                BridgeError::parse_error(format!("Bad bank balance for {}", coin.denom))
                    .with_details(e.to_string())
            })?;
            balances.insert(coin.denom, amount);
        }
    }
    Ok(balances)
}

fn is_cw20(token: &str) -> bool {
    token.starts_with(CW20_PREFIX)
}

#[async_trait]
impl BalanceSource for TerraLcdSource {
    fn chain(&self) -> Chain {
        Chain::Terra
    }

    async fn fetch_balances(&self, address: &str, whitelist: &WhiteList) -> BridgeResult<BalanceList> {
        if !address.starts_with(CW20_PREFIX) {
            return Err(BridgeError::new(
                crate::error::ErrorCode::InvalidAddress,
                "Terra balances need a terra1 address",
            ));
        }

        let (tokens, denoms): (Vec<&String>, Vec<&String>) =
            whitelist.values().filter(|t| !t.is_empty()).partition(|t| is_cw20(t));

        let mut balances = self.fetch_native(address, &denoms).await?;
        for token in tokens {
            let amount = self.fetch_cw20(address, token).await?;
            balances.insert(token.clone(), amount);
        }

        if balances.is_empty() {
            log_warn!("terra", "No balances returned", address = address);
        } else {
            log_debug!("terra", "Fetched balances", address = address, count = balances.len());
        }
        Ok(balances)
    }
}
