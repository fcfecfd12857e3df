//! Full-walk chain verification.
//!
//! Unlike a first-error check, [`verify_entries`] visits every entry and
//! records every fault it finds, so a single corruption shows up together
//! with any downstream linkage it broke.

use std::collections::HashMap;
use std::fmt;

use proofgate_types::ContentHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::entry::LogEntry;

/// One kind of chain fault.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainFault {
    #[error("index gap: expected {expected}, found {found}")]
    IndexGap { expected: u64, found: u64 },

    #[error("genesis entry carries a previous hash")]
    GenesisHasPrevious,

    #[error("non-genesis entry has no previous hash")]
    MissingPrevious,

    #[error("broken link: expected previous {expected}, found {found:?}")]
    BrokenLink {
        expected: ContentHash,
        found: Option<ContentHash>,
    },

    #[error("entry hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        stored: ContentHash,
        computed: ContentHash,
    },

    #[error("fork: previous hash {previous_hash} already claimed by entry {first_index}")]
    Fork {
        first_index: u64,
        previous_hash: ContentHash,
    },

    #[error("payload hash mismatch: anchored {anchored}, computed {computed}")]
    PayloadMismatch {
        anchored: ContentHash,
        computed: ContentHash,
    },
}

/// A fault located at a chain position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIssue {
    /// Position in the walked sequence.
    pub index: u64,
    pub fault: ChainFault,
}

impl fmt::Display for ChainIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.fault)
    }
}

/// Result of walking a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub chain_intact: bool,
    pub entries_checked: usize,
    pub issues: Vec<ChainIssue>,
}

impl ChainVerification {
    /// Distinct failing positions, ascending.
    pub fn failing_indices(&self) -> Vec<u64> {
        let mut indices: Vec<u64> = self.issues.iter().map(|i| i.index).collect();
        indices.dedup();
        indices
    }

    pub fn has_fork(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.fault, ChainFault::Fork { .. }))
    }

    pub fn issues_at(&self, index: u64) -> impl Iterator<Item = &ChainIssue> {
        self.issues.iter().filter(move |i| i.index == index)
    }

    pub(crate) fn push(&mut self, index: u64, fault: ChainFault) {
        self.chain_intact = false;
        self.issues.push(ChainIssue { index, fault });
    }
}

/// Walk `entries` front to back and report every fault.
pub fn verify_entries(entries: &[LogEntry]) -> ChainVerification {
    let mut report = ChainVerification {
        chain_intact: true,
        entries_checked: entries.len(),
        issues: Vec::new(),
    };
    let mut claimed: HashMap<ContentHash, u64> = HashMap::new();

    for (position, entry) in entries.iter().enumerate() {
        let position = position as u64;

        if entry.index != position {
            report.push(
                position,
                ChainFault::IndexGap {
                    expected: position,
                    found: entry.index,
                },
            );
        }

        if position == 0 {
            if entry.previous_hash.is_some() {
                report.push(position, ChainFault::GenesisHasPrevious);
            }
        } else {
            let expected = entries[(position - 1) as usize].entry_hash;
            match entry.previous_hash {
                None => report.push(position, ChainFault::MissingPrevious),
                Some(found) if found != expected => report.push(
                    position,
                    ChainFault::BrokenLink {
                        expected,
                        found: Some(found),
                    },
                ),
                Some(_) => {}
            }
        }

        if let Some(prev) = entry.previous_hash {
            if let Some(first_index) = claimed.get(&prev) {
                report.push(
                    position,
                    ChainFault::Fork {
                        first_index: *first_index,
                        previous_hash: prev,
                    },
                );
            } else {
                claimed.insert(prev, position);
            }
        }

        let computed = entry.recompute_hash();
        if computed != entry.entry_hash {
            report.push(
                position,
                ChainFault::HashMismatch {
                    stored: entry.entry_hash,
                    computed,
                },
            );
        }
    }

    if !report.chain_intact {
        warn!(
            entries = report.entries_checked,
            issues = report.issues.len(),
            failing = ?report.failing_indices(),
            "hash chain failed verification"
        );
    }

    report
}
