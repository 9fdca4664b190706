//! Telegram notifier: HTML entry and error messages for the presale chat.
//!
//! Formatting mirrors the announcement wording used in production: a 4-decimal
//! ETH amount with an optional USD conversion, truncated addresses, grouped
//! gas, an Etherscan link, and a fixed UTC timestamp (locale-independent).

use chrono::DateTime;
use thiserror::Error;

use crate::etherscan::Transaction;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const EXPLORER_TX_BASE: &str = "https://etherscan.io/tx";

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error: {0}")]
    Api(String),
}

/// ETH amount from a decimal wei string, fixed to 4 decimal places.
pub fn format_eth_amount(wei: &str) -> String {
    match wei.parse::<u128>() {
        Ok(v) => format!("{:.4}", v as f64 / 1e18),
        Err(_) => "0.0000".to_string(),
    }
}

/// Shorten an address for display: first 6 + "..." + last 4 characters.
pub fn format_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Group a decimal integer with commas (21000 -> "21,000").
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Dollar-format a non-negative amount with grouping and cents ("$3,000.00").
pub fn format_usd(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Render a Unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "unknown".to_string(),
    }
}

/// Build the announcement message for one qualifying transaction. The USD
/// conversion uses the already-rounded 4-decimal ETH amount and appears only
/// when a price is available.
pub fn format_entry_message(tx: &Transaction, eth_price: Option<f64>) -> String {
    let eth_amount = format_eth_amount(&tx.value);
    let usd = eth_price
        .and_then(|price| eth_amount.parse::<f64>().ok().map(|amount| amount * price))
        .map(|value| format!(" ({})", format_usd(value)))
        .unwrap_or_default();
    let gas = match tx.gas_used.parse::<u64>() {
        Ok(g) => group_thousands(g),
        Err(_) => "0".to_string(),
    };
    let time = match tx.time_stamp.parse::<i64>() {
        Ok(secs) => format_timestamp(secs),
        Err(_) => "unknown".to_string(),
    };
    format!(
        "🚀 <b>NEW RNS PRESALE ENTRY!</b>\n\
         \n\
         💰 <b>Amount:</b> {eth_amount} ETH{usd}\n\
         👤 <b>From:</b> <code>{from}</code>\n\
         🏦 <b>To:</b> <code>{to}</code>\n\
         ⛽ <b>Gas Used:</b> {gas}\n\
         🔗 <b>Transaction:</b> <a href=\"{EXPLORER_TX_BASE}/{hash}\">View on Etherscan</a>\n\
         ⏰ <b>Time:</b> {time}\n\
         \n\
         🎉 <i>Welcome to the RNS presale!</i>",
        from = format_address(&tx.from),
        to = format_address(&tx.to),
        hash = tx.hash,
    )
}

/// Build the best-effort failure notice sent when a cycle errors out.
pub fn format_error_message(reason: &str) -> String {
    format!("⚠️ <b>RNS Monitor Error:</b>\n<code>{reason}</code>")
}

/// Notifier for one bot/chat pair. Holds a shared HTTP client.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("base_url", &self.base_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_base_url(TELEGRAM_API_URL, bot_token, chat_id)
    }

    /// Notifier against a non-default endpoint (tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Deliver one HTML message to the configured chat. Not retried; the
    /// caller decides whether a failure matters.
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": false,
        });
        let resp = self.http.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api(format!("{status}: {detail}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction {
            block_number: "18000001".to_string(),
            time_stamp: "1693526400".to_string(),
            hash: "0xbbb".to_string(),
            from: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            to: "0xfeedfacefeedfacefeedfacefeedfacefeedface".to_string(),
            value: "2000000000000000000".to_string(),
            gas_used: "52100".to_string(),
        }
    }

    #[test]
    fn eth_amount_fixed_to_four_decimals() {
        assert_eq!(format_eth_amount("1500000000000000000"), "1.5000");
        assert_eq!(format_eth_amount("2000000000000000000"), "2.0000");
        assert_eq!(format_eth_amount("123400000000000000"), "0.1234");
        assert_eq!(format_eth_amount("0"), "0.0000");
        assert_eq!(format_eth_amount("not-a-number"), "0.0000");
    }

    #[test]
    fn address_truncation() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        // Too short to truncate: returned unchanged.
        assert_eq!(format_address("0x1234"), "0x1234");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(123), "123");
        assert_eq!(group_thousands(21_000), "21,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(3000.0), "$3,000.00");
        assert_eq!(format_usd(1500.25), "$1,500.25");
        assert_eq!(format_usd(0.994), "$0.99");
    }

    #[test]
    fn timestamp_renders_in_utc() {
        assert_eq!(format_timestamp(1_693_526_400), "2023-09-01 00:00:00 UTC");
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn entry_message_with_price() {
        let message = format_entry_message(&sample_tx(), Some(1500.0));
        assert!(message.contains("🚀 <b>NEW RNS PRESALE ENTRY!</b>"));
        assert!(message.contains("💰 <b>Amount:</b> 2.0000 ETH ($3,000.00)"));
        assert!(message.contains("👤 <b>From:</b> <code>0x1234...5678</code>"));
        assert!(message.contains("🏦 <b>To:</b> <code>0xfeed...face</code>"));
        assert!(message.contains("⛽ <b>Gas Used:</b> 52,100"));
        assert!(message.contains("<a href=\"https://etherscan.io/tx/0xbbb\">View on Etherscan</a>"));
        assert!(message.contains("⏰ <b>Time:</b> 2023-09-01 00:00:00 UTC"));
        assert!(message.contains("🎉 <i>Welcome to the RNS presale!</i>"));
    }

    #[test]
    fn entry_message_without_price_omits_usd() {
        let message = format_entry_message(&sample_tx(), None);
        assert!(message.contains("💰 <b>Amount:</b> 2.0000 ETH\n"));
        assert!(!message.contains("$"));
    }

    #[test]
    fn error_message_wraps_reason_in_code() {
        let message = format_error_message("decode error: missing field");
        assert_eq!(
            message,
            "⚠️ <b>RNS Monitor Error:</b>\n<code>decode error: missing field</code>"
        );
    }

    #[test]
    fn debug_output_redacts_the_bot_token() {
        let notifier = TelegramNotifier::new("123456:super-secret", "-100200300");
        let printed = format!("{notifier:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("-100200300"));
    }

    #[tokio::test]
    async fn send_to_unreachable_endpoint_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier =
            TelegramNotifier::with_base_url(format!("http://{addr}"), "token", "chat");
        match notifier.send_message("hello").await {
            Err(TelegramError::Http(_)) => {}
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
