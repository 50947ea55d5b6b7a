//! HTTP helpers shared by the balance sources
//!
//! One pooled async client per aggregator; every request checks the HTTP
//! status before decoding so provider failures surface as
//! `ErrorCode::ProviderError` instead of a confusing JSON error.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::error::{BridgeError, BridgeResult};

pub const USER_AGENT: &str = concat!("bridge-assets/", env!("CARGO_PKG_VERSION"));

/// Build the pooled client used by all sources
pub fn build_client(timeout: Duration) -> BridgeResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(5)
        .tcp_nodelay(true)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| BridgeError::network_error(format!("Failed to create HTTP client: {}", e)))
}

/// GET a JSON document
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> BridgeResult<T> {
    let response = client.get(url).send().await?;
    decode(response, url).await
}

/// POST a JSON body and decode the JSON answer
pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &Client,
    url: &str,
    body: &B,
) -> BridgeResult<T> {
    let response = client.post(url).json(body).send().await?;
    decode(response, url).await
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> BridgeResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::provider_error(format!("{} returned {}", origin(url), status))
            .with_details(truncate(&body, 200)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| {
            BridgeError::parse_error(format!("Invalid response from {}: {}", origin(url), e.without_url()))
        })
}

/// Scheme, host and port only; paths and queries may carry API keys or
/// encoded addresses
fn origin(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.origin().ascii_serialization(),
        Err(_) => "<invalid url>".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_hides_path_and_query() {
        assert_eq!(
            origin("https://lcd.terra.dev/terra/wasm/v1beta1/contracts/x/store?query_msg=abc"),
            "https://lcd.terra.dev"
        );
        assert_eq!(origin("https://mainnet.infura.io/v3/secretproject?x=1"), "https://mainnet.infura.io");
        assert_eq!(origin("http://127.0.0.1:1317/cosmos/bank"), "http://127.0.0.1:1317");
        assert_eq!(origin("not a url"), "<invalid url>");
    }

    #[tokio::test]
    async fn test_provider_error_hides_path() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 4\r\nconnection: close\r\n\r\noops";
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let client = Client::builder().no_proxy().build().unwrap();
        let url = format!("http://{}/v3/secretproject?module=account", addr);
        let err = get_json::<serde_json::Value>(&client, &url).await.unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::ProviderError);
        assert_eq!(err.message, format!("http://{} returned 500 Internal Server Error", addr));
        assert!(!err.to_string().contains("secretproject"));
        assert_eq!(err.details.as_deref(), Some("oops"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_build_client() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        assert!(client.get("https://example.com").build().is_ok());
    }
}
