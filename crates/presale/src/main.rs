//! Presale monitor entry point: one poll cycle, then exit.
//!
//! Reads TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID, ETHERSCAN_API_KEY and
//! PRESALE_ADDRESS from the environment (optional: STATE_FILE, RUST_LOG),
//! checks the presale address for new incoming transactions, announces each
//! one to the chat, and persists the cursor. Scheduling is external: run it
//! from cron or a CI timer for continuous monitoring.
//!
//! Usage:
//!
//!   presale-monitor
//!
//! The process always exits 0; failures are logged, and non-rate-limit
//! failures additionally produce a best-effort error message in the chat.

use presale::{Config, Monitor};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!(
        address = %config.presale_address,
        chat = %config.telegram_chat_id,
        state_file = %config.state_file.display(),
        "presale monitor started"
    );

    let monitor = Monitor::new(config);
    match monitor.run_cycle().await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                qualifying = report.qualifying,
                notified = report.notified,
                "monitor cycle completed"
            );
        }
        Err(e) if e.is_rate_limited() => {
            tracing::warn!("explorer rate limited, will retry next cycle");
        }
        Err(e) => {
            tracing::error!(reason = %e, "monitor cycle failed");
            monitor.notify_error(&e.to_string()).await;
        }
    }
}
