//! Typed append-only ledgers over the hash chain.
//!
//! Obligation and violation ledgers share the chain primitive: each record
//! keeps its payload next to the [`LogEntry`] anchoring it, and ledger
//! verification re-derives every payload hash on top of the chain walk.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::HashChain;
use crate::entry::LogEntry;
use crate::error::ChainResult;
use crate::payload::ChainPayload;
use crate::verify::{ChainFault, ChainVerification};

/// A payload and the chain entry that anchors it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord<P> {
    pub entry: LogEntry,
    pub payload: P,
}

/// An append-only ledger of `P` records.
#[derive(Clone, Debug)]
pub struct Ledger<P> {
    name: String,
    chain: HashChain,
    payloads: Vec<P>,
}

impl<P: ChainPayload + Clone> Ledger<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: HashChain::new(),
            payloads: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a record.
    pub fn record(&mut self, payload: P) -> ChainResult<LedgerRecord<P>> {
        let entry = self.chain.append(payload.payload_hash())?.clone();
        self.payloads.push(payload.clone());
        debug!(ledger = %self.name, index = entry.index, "ledger record appended");
        Ok(LedgerRecord { entry, payload })
    }

    pub fn records(&self) -> Vec<LedgerRecord<P>> {
        self.chain
            .entries()
            .iter()
            .zip(self.payloads.iter())
            .map(|(entry, payload)| LedgerRecord {
                entry: entry.clone(),
                payload: payload.clone(),
            })
            .collect()
    }

    pub fn payloads(&self) -> &[P] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Chain walk plus payload re-hash for every record.
    pub fn verify(&self) -> ChainVerification {
        verify_records(&self.records())
    }
}

/// Verify detached ledger records (e.g. loaded from storage).
pub fn verify_records<P: ChainPayload>(records: &[LedgerRecord<P>]) -> ChainVerification {
    let entries: Vec<LogEntry> = records.iter().map(|r| r.entry.clone()).collect();
    let mut report = crate::verify::verify_entries(&entries);

    for (position, record) in records.iter().enumerate() {
        let computed = record.payload.payload_hash();
        if computed != record.entry.payload_hash {
            report.push(
                position as u64,
                ChainFault::PayloadMismatch {
                    anchored: record.entry.payload_hash,
                    computed,
                },
            );
        }
    }
    report.issues.sort_by_key(|i| i.index);
    report
}
