//! Example: format a sample presale entry message with and without a price.
//!
//! Builds one fabricated transaction and prints the exact HTML the notifier
//! would send, first with a live-looking ETH price and then without one. No
//! network access and no configuration required.
//!
//! Usage:
//!
//!   cargo run -p presale --example message_preview

use presale::{format_entry_message, Transaction};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!(
            "Usage: message_preview\n\
             Prints the notification message for a sample transaction,\n\
             once with an ETH price and once without."
        );
        std::process::exit(0);
    }

    let tx = Transaction {
        block_number: "18000001".to_string(),
        time_stamp: "1693526400".to_string(),
        hash: "0x9c0f9b2a41d5e7f3c8d6a1b0e4f2c3d4e5f60718293a4b5c6d7e8f9012345678".to_string(),
        from: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
        to: "0xfeedfacefeedfacefeedfacefeedfacefeedface".to_string(),
        value: "2000000000000000000".to_string(),
        gas_used: "52100".to_string(),
    };

    println!("--- with price ---");
    println!("{}", format_entry_message(&tx, Some(1500.0)));
    println!();
    println!("--- without price ---");
    println!("{}", format_entry_message(&tx, None));
}
