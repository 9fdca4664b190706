//! Shared fixtures for integration tests.

use presale::Transaction;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Transaction row with the given block/hash/value and fixed plausible
/// remaining fields.
pub fn tx(block: &str, hash: &str, value: &str) -> Transaction {
    Transaction {
        block_number: block.to_string(),
        time_stamp: "1693526400".to_string(),
        hash: hash.to_string(),
        from: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
        to: "0xfeedfacefeedfacefeedfacefeedfacefeedface".to_string(),
        value: value.to_string(),
        gas_used: "21000".to_string(),
    }
}

/// Success `txlist` envelope carrying the given rows, as the explorer would
/// serialize it.
pub fn txlist_body(rows: &[Transaction]) -> String {
    let result: Vec<serde_json::Value> = rows
        .iter()
        .map(|t| {
            serde_json::json!({
                "blockNumber": t.block_number,
                "timeStamp": t.time_stamp,
                "hash": t.hash,
                "from": t.from,
                "to": t.to,
                "value": t.value,
                "gasUsed": t.gas_used,
            })
        })
        .collect();
    serde_json::json!({"status": "1", "message": "OK", "result": result}).to_string()
}

/// http:// URL of a freshly bound-then-dropped localhost port, so requests
/// against it are refused immediately.
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// http:// URL of a local endpoint that answers one connection per body,
/// in order, each as a `200 OK` JSON response. Connections past the last
/// body are refused, so a test fails loudly if the client over-fetches.
pub fn canned_endpoint(bodies: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        for body in bodies {
            let (mut stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            // Drain the request head before answering.
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    base
}
