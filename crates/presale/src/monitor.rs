//! Cycle orchestrator: one poll-filter-notify-persist pass per invocation.

use thiserror::Error;
use tokio::time::{sleep, Duration};

use crate::config::Config;
use crate::cursor::CursorStore;
use crate::etherscan::{EtherscanClient, ExplorerError};
use crate::filter::select_new;
use crate::price::PriceClient;
use crate::telegram::{format_entry_message, format_error_message, TelegramNotifier};

/// Pause between consecutive notification sends within one cycle.
const SEND_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("explorer request failed: {0}")]
    Explorer(#[from] ExplorerError),
    #[error(transparent)]
    State(#[from] anyhow::Error),
}

impl CycleError {
    /// True for explorer rate limits, which are logged but never notified.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CycleError::Explorer(ExplorerError::RateLimited))
    }
}

/// Counts from one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Rows returned by the explorer.
    pub fetched: usize,
    /// Rows newer than the cursor with non-zero value.
    pub qualifying: usize,
    /// Notifications delivered.
    pub notified: usize,
}

/// The monitor: wiring of store, explorer, price lookup, and notifier.
pub struct Monitor {
    config: Config,
    store: CursorStore,
    explorer: EtherscanClient,
    price: PriceClient,
    notifier: TelegramNotifier,
}

impl Monitor {
    pub fn new(config: Config) -> Self {
        let store = CursorStore::new(&config.state_file);
        let explorer = EtherscanClient::new(config.etherscan_api_key.clone());
        let price = PriceClient::new();
        let notifier = TelegramNotifier::new(
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
        );
        Self::with_parts(config, store, explorer, price, notifier)
    }

    /// Assemble from explicit parts (tests, alternate endpoints).
    pub fn with_parts(
        config: Config,
        store: CursorStore,
        explorer: EtherscanClient,
        price: PriceClient,
        notifier: TelegramNotifier,
    ) -> Self {
        Self {
            config,
            store,
            explorer,
            price,
            notifier,
        }
    }

    /// Run one cycle: load cursor, fetch ascending from its block, filter,
    /// notify serially, persist the cursor from the last qualifying row.
    ///
    /// The fetch starts at the cursor block itself; the filter's hash
    /// tie-break drops the row the cursor already points at. Send failures
    /// are logged and skipped; the cursor is persisted regardless of send
    /// outcomes.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let cursor = self.store.load();
        tracing::info!(
            from_block = cursor.last_block_number,
            "checking for new transactions"
        );

        let fetched = self
            .explorer
            .fetch_transactions(&self.config.presale_address, cursor.last_block_number)
            .await?;
        if fetched.is_empty() {
            tracing::info!("no transactions returned");
            return Ok(CycleReport::default());
        }

        let qualifying = select_new(&fetched, &cursor);
        let mut report = CycleReport {
            fetched: fetched.len(),
            qualifying: qualifying.len(),
            notified: 0,
        };
        if qualifying.is_empty() {
            tracing::info!(fetched = report.fetched, "no new transactions since last cursor");
            return Ok(report);
        }
        tracing::info!(count = report.qualifying, "found new transactions");

        let eth_price = self.price.eth_usd().await;

        for (i, tx) in qualifying.iter().enumerate() {
            if i > 0 {
                sleep(SEND_PAUSE).await;
            }
            let message = format_entry_message(tx, eth_price);
            match self.notifier.send_message(&message).await {
                Ok(()) => {
                    report.notified += 1;
                    tracing::info!(hash = %tx.hash, "notification sent");
                }
                Err(e) => {
                    tracing::warn!(hash = %tx.hash, reason = %e, "notification failed");
                }
            }
        }

        // The filter admits only rows with parseable block numbers.
        if let Some(last) = qualifying.last() {
            match last.block_number.parse::<u64>() {
                Ok(block) => {
                    self.store.save(block, &last.hash)?;
                    tracing::info!(block, hash = %last.hash, "cursor updated");
                }
                Err(_) => {
                    tracing::warn!(block = %last.block_number, "unparseable block on last row, cursor not updated");
                }
            }
        }

        Ok(report)
    }

    /// Best-effort error notice to the chat; failures are only logged.
    pub async fn notify_error(&self, reason: &str) {
        let message = format_error_message(reason);
        if let Err(e) = self.notifier.send_message(&message).await {
            tracing::warn!(reason = %e, "error notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_distinguished() {
        let rate_limited = CycleError::Explorer(ExplorerError::RateLimited);
        assert!(rate_limited.is_rate_limited());

        let decode = CycleError::Explorer(ExplorerError::Decode("bad".to_string()));
        assert!(!decode.is_rate_limited());

        let state = CycleError::State(anyhow::anyhow!("disk full"));
        assert!(!state.is_rate_limited());
    }

    #[test]
    fn cycle_report_defaults_to_zero() {
        assert_eq!(CycleReport::default(), CycleReport { fetched: 0, qualifying: 0, notified: 0 });
    }
}
