//! Monitor configuration, read once at startup and passed into components.

use std::path::PathBuf;

/// Default path of the persisted cursor file (working directory).
pub const DEFAULT_STATE_FILE: &str = "last_transaction.json";

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token (TELEGRAM_BOT_TOKEN).
    pub telegram_bot_token: String,
    /// Telegram chat id to notify (TELEGRAM_CHAT_ID).
    pub telegram_chat_id: String,
    /// Etherscan API key (ETHERSCAN_API_KEY).
    pub etherscan_api_key: String,
    /// Presale address whose incoming transactions are monitored (PRESALE_ADDRESS).
    pub presale_address: String,
    /// Cursor file path (STATE_FILE, default `last_transaction.json`).
    pub state_file: PathBuf,
}

impl Config {
    /// Read the configuration from the environment. Missing required values
    /// become empty strings and fail at the downstream API call, not here.
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_chat_id: std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
            etherscan_api_key: std::env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
            presale_address: std::env::var("PRESALE_ADDRESS").unwrap_or_default(),
            state_file: std::env::var("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE)),
        }
    }
}
