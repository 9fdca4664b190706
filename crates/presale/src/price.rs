//! ETH/USD price lookup via the CoinGecko simple-price endpoint.

use serde::Deserialize;

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    ethereum: VsCurrencies,
}

#[derive(Debug, Deserialize)]
struct VsCurrencies {
    usd: f64,
}

/// Price client. Lookup failures are non-fatal: callers receive `None` and
/// render messages without the USD conversion.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
}

impl PriceClient {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Client against a non-default endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_eth_usd(&self) -> Result<f64, reqwest::Error> {
        let url = format!("{}/simple/price", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("ids", "ethereum"), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?;
        let body: SimplePriceResponse = resp.json().await?;
        Ok(body.ethereum.usd)
    }

    /// Current ETH price in USD, or `None` on any failure.
    pub async fn eth_usd(&self) -> Option<f64> {
        match self.fetch_eth_usd().await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::warn!(reason = %e, "ETH price lookup failed");
                None
            }
        }
    }
}

impl Default for PriceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_price_response() {
        let body = r#"{"ethereum":{"usd":1500.25}}"#;
        let parsed: SimplePriceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.ethereum.usd, 1500.25);
    }

    #[test]
    fn decode_unexpected_shape_fails() {
        let body = r#"{"bitcoin":{"usd":65000.0}}"#;
        assert!(serde_json::from_str::<SimplePriceResponse>(body).is_err());
    }

    #[tokio::test]
    async fn eth_usd_is_none_when_endpoint_unreachable() {
        // Bind then drop a listener so the port is closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PriceClient::with_base_url(format!("http://{addr}"));
        assert_eq!(client.eth_usd().await, None);
    }
}
