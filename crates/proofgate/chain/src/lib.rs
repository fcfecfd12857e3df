//! # proofgate-chain
//!
//! Append-only, tamper-evident hash chain.
//!
//! Each [`LogEntry`] stores a contiguous zero-based index, the hash of its
//! payload, and the entry hash of its predecessor (absent only at index 0):
//!
//! ```text
//! entry_hash = BLAKE3(canonical(index, payload_hash, previous_hash))
//!
//!  ┌─────────┐     ┌─────────┐     ┌─────────┐
//!  │ #0      │◄────│ #1      │◄────│ #2      │
//!  │ prev: ∅ │     │ prev: h0│     │ prev: h1│
//!  └─────────┘     └─────────┘     └─────────┘
//! ```
//!
//! The same primitive backs attestation records and typed ledgers
//! ([`Ledger`]). Verification ([`verify_entries`]) walks the whole chain and
//! reports every broken index instead of stopping at the first.
//!
//! ## Writers
//!
//! - [`HashChain`]: in-memory; `append(&mut self)` makes single-writer static.
//! - [`ChainWriter`]: shared async writer over a [`ChainStore`]; serializes
//!   appenders so the tail read and the next entry's link are atomic.

#![deny(unsafe_code)]

pub mod chain;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod payload;
pub mod store;
pub mod verify;
pub mod writer;

pub use chain::HashChain;
pub use entry::LogEntry;
pub use error::{ChainError, ChainResult};
pub use ledger::{verify_records, Ledger, LedgerRecord};
pub use payload::ChainPayload;
pub use store::{ChainStore, JsonlChainStore, MemoryChainStore};
pub use verify::{verify_entries, ChainFault, ChainIssue, ChainVerification};
pub use writer::ChainWriter;
