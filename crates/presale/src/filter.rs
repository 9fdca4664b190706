//! Selection of qualifying transactions relative to the persisted cursor.

use crate::cursor::Cursor;
use crate::etherscan::Transaction;

fn parsed_block(tx: &Transaction) -> Option<u64> {
    tx.block_number.parse().ok()
}

/// True when `tx` is strictly newer than the cursor and carries value.
///
/// Newer means a higher block, or the cursor's own block with a different
/// hash (the tie-break for multiple transactions in the last-seen block).
/// Zero-value rows and rows with an unparseable block number never qualify.
pub fn is_qualifying(tx: &Transaction, cursor: &Cursor) -> bool {
    if tx.value == "0" {
        return false;
    }
    let block = match parsed_block(tx) {
        Some(b) => b,
        None => return false,
    };
    block > cursor.last_block_number
        || (block == cursor.last_block_number
            && cursor.last_transaction_hash.as_deref() != Some(tx.hash.as_str()))
}

/// Select the qualifying transactions, preserving input order (the explorer
/// returns ascending blocks; nothing is re-sorted here).
pub fn select_new<'a>(transactions: &'a [Transaction], cursor: &Cursor) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| is_qualifying(tx, cursor))
        .collect()
}
