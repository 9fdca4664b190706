//! Persisted cursor: the last processed block/transaction for the monitored address.
//!
//! The cursor is the only state carried across invocations. It is written as
//! pretty-printed JSON with camelCase keys and a millisecond-epoch timestamp,
//! so files produced by earlier deployments of the monitor load unchanged.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cursor: last processed position in the address's transaction history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub last_block_number: u64,
    pub last_transaction_hash: Option<String>,
    /// When the cursor was written (informational only; not read back).
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Cursor {
    pub fn new(last_block_number: u64, last_transaction_hash: Option<String>) -> Self {
        Self {
            last_block_number,
            last_transaction_hash,
            timestamp: None,
        }
    }
}

/// File-backed cursor store. One file, one record, full overwrite on save.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted cursor. A missing or unreadable or unparseable file
    /// falls back to the default cursor (block 0, no hash).
    pub fn load(&self) -> Cursor {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(cursor) => cursor,
                Err(e) => {
                    tracing::info!(path = %self.path.display(), reason = %e, "cursor file unreadable, starting fresh");
                    Cursor::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %self.path.display(), "no previous cursor, starting fresh");
                Cursor::default()
            }
        }
    }

    /// Overwrite the persisted cursor with the given position, stamped now.
    pub fn save(&self, block_number: u64, hash: &str) -> Result<()> {
        let cursor = Cursor {
            last_block_number: block_number,
            last_transaction_hash: Some(hash.to_string()),
            timestamp: Some(Utc::now()),
        };
        let data = serde_json::to_string_pretty(&cursor).context("serialize cursor")?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("write cursor file {}", self.path.display()))?;
        Ok(())
    }
}
