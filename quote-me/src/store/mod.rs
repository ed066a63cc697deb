//! Quote store — the JSON-file-backed collection of quotes.
//!
//! The store keeps one authoritative in-memory copy and rewrites the whole
//! file after every mutation that changed something. It assumes a single
//! writer process: two processes mutating the same file concurrently can lose
//! an update (last write wins).

mod error;
pub mod file_ops;
mod quote_store;

pub use error::{StoreError, StoreResult};
pub use quote_store::{QuoteStore, STORE_FILE_NAME};
