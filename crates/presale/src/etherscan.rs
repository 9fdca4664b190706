//! Etherscan account client: transaction lists for the monitored address.
//!
//! Wraps `module=account&action=txlist`, ascending from a start block, 100
//! rows per page, paginating until a short page. The API envelope reports
//! "no results" and API-level errors through the same `status != "1"` shape;
//! only rate limits and transport/decode failures surface as errors here,
//! everything else non-success is an empty list.

use serde::Deserialize;
use thiserror::Error;

const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";

/// Rows per `txlist` page (Etherscan `offset` parameter).
const PAGE_SIZE: usize = 100;

/// One row of the `txlist` payload. Etherscan serializes every field as a
/// decimal string; rows are kept verbatim and parsed where used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Transfer value in wei.
    pub value: String,
    pub gas_used: String,
}

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("explorer rate limit reached")]
    RateLimited,
    #[error("decode error: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct TxListEnvelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

fn is_rate_limit(envelope: &TxListEnvelope) -> bool {
    let text = envelope.result.as_str().unwrap_or(&envelope.message);
    text.to_ascii_lowercase().contains("rate limit")
}

/// Decode a `txlist` response body. `status == "1"` carries the row array;
/// any other status is an empty list unless it is a rate-limit report.
fn decode_txlist(body: &str) -> Result<Vec<Transaction>, ExplorerError> {
    let envelope: TxListEnvelope =
        serde_json::from_str(body).map_err(|e| ExplorerError::Decode(e.to_string()))?;
    if envelope.status == "1" {
        return serde_json::from_value(envelope.result)
            .map_err(|e| ExplorerError::Decode(e.to_string()));
    }
    if is_rate_limit(&envelope) {
        return Err(ExplorerError::RateLimited);
    }
    tracing::debug!(
        status = %envelope.status,
        message = %envelope.message,
        "explorer reported no results"
    );
    Ok(Vec::new())
}

/// Etherscan client for one API key. Holds a shared HTTP client.
#[derive(Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for EtherscanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherscanClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl EtherscanClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(ETHERSCAN_API_URL, api_key)
    }

    /// Client against a non-default endpoint (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_page(
        &self,
        address: &str,
        from_block: u64,
        page: u64,
    ) -> Result<Vec<Transaction>, ExplorerError> {
        let params = [
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("startblock", from_block.to_string()),
            ("endblock", "latest".to_string()),
            ("page", page.to_string()),
            ("offset", PAGE_SIZE.to_string()),
            ("sort", "asc".to_string()),
            ("apikey", self.api_key.clone()),
        ];
        let resp = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplorerError::RateLimited);
        }
        let body = resp.error_for_status()?.text().await?;
        decode_txlist(&body)
    }

    /// Fetch all transactions to `address` from `from_block` to the chain
    /// head, ascending. Pages are accumulated until one comes back short, so
    /// a burst larger than one page is still seen in full. A failed page
    /// fails the whole fetch.
    pub async fn fetch_transactions(
        &self,
        address: &str,
        from_block: u64,
    ) -> Result<Vec<Transaction>, ExplorerError> {
        let mut all = Vec::new();
        let mut page = 1u64;
        loop {
            let batch = self.fetch_page(address, from_block, page).await?;
            let short = batch.len() < PAGE_SIZE;
            all.extend(batch);
            if short {
                break;
            }
            page += 1;
        }
        if !all.is_empty() {
            tracing::debug!(count = all.len(), pages = page, from_block, "fetched transaction list");
        }
        Ok(all)
    }
}
