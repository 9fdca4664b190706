//! Off-chain presale monitor: polling, filtering, and Telegram notification
//! for transactions into the RNS presale address.
//!
//! - **EtherscanClient**: ascending transaction list for the address from the
//!   cursor block (paged, 100 rows per page).
//! - **select_new**: cursor-relative dedup; drops zero-value rows.
//! - **TelegramNotifier**: HTML entry/error messages to one chat.
//! - **Monitor**: one poll-filter-notify-persist cycle per invocation; the
//!   cursor file is the only state carried across runs.

pub mod config;
pub mod cursor;
pub mod etherscan;
pub mod filter;
pub mod monitor;
pub mod price;
pub mod telegram;

pub use config::{Config, DEFAULT_STATE_FILE};
pub use cursor::{Cursor, CursorStore};
pub use etherscan::{EtherscanClient, ExplorerError, Transaction};
pub use filter::{is_qualifying, select_new};
pub use monitor::{CycleError, CycleReport, Monitor};
pub use price::PriceClient;
pub use telegram::{
    format_address, format_entry_message, format_error_message, format_eth_amount,
    TelegramError, TelegramNotifier,
};
