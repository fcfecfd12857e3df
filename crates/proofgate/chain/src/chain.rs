use proofgate_types::ContentHash;
use tracing::debug;

use crate::entry::LogEntry;
use crate::error::{ChainError, ChainResult};
use crate::verify::{verify_entries, ChainVerification};

/// In-memory append-only hash chain.
///
/// Appending takes `&mut self`, so linkage is computed against the true
/// tail by construction. Entries are never edited; the only removal is the
/// whole-chain [`HashChain::clear_for_testing`].
#[derive(Clone, Debug, Default)]
pub struct HashChain {
    entries: Vec<LogEntry>,
}

impl HashChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt previously persisted entries. Refuses a chain that does not verify.
    pub fn from_entries(entries: Vec<LogEntry>) -> ChainResult<Self> {
        let report = verify_entries(&entries);
        if let Some(first) = report.issues.first() {
            return Err(ChainError::CorruptChain {
                issues: report.issues.len(),
                first_index: first.index,
            });
        }
        Ok(Self { entries })
    }

    /// The entry that appending `payload_hash` would produce, without committing it.
    pub fn next_entry(&self, payload_hash: ContentHash) -> LogEntry {
        LogEntry::new(
            self.entries.len() as u64,
            payload_hash,
            self.head_hash(),
        )
    }

    /// Commit an entry prepared with [`HashChain::next_entry`].
    ///
    /// Rejects entries whose index or previous hash no longer match the tail.
    pub fn commit(&mut self, entry: LogEntry) -> ChainResult<&LogEntry> {
        let expected_index = self.entries.len() as u64;
        if entry.index != expected_index {
            return Err(ChainError::AppendRejected {
                index: entry.index,
                reason: format!("expected index {expected_index}"),
            });
        }
        if entry.previous_hash != self.head_hash() {
            return Err(ChainError::AppendRejected {
                index: entry.index,
                reason: "previous hash does not match chain tail".into(),
            });
        }
        if !entry.is_sealed() {
            return Err(ChainError::AppendRejected {
                index: entry.index,
                reason: "entry hash does not match link fields".into(),
            });
        }

        debug!(
            index = entry.index,
            entry_hash = %entry.entry_hash.short(),
            "chain entry appended"
        );
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Append a payload hash and return the new entry.
    pub fn append(&mut self, payload_hash: ContentHash) -> ChainResult<&LogEntry> {
        let entry = self.next_entry(payload_hash);
        self.commit(entry)
    }

    pub fn head_hash(&self) -> Option<ContentHash> {
        self.entries.last().map(|e| e.entry_hash)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn get(&self, index: u64) -> Option<&LogEntry> {
        self.entries.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn verify(&self) -> ChainVerification {
        verify_entries(&self.entries)
    }

    /// Wipe the entire chain. Test-only and always logged.
    #[cfg(any(test, feature = "test-support"))]
    pub fn clear_for_testing(&mut self) {
        tracing::warn!(
            entries = self.entries.len(),
            "clearing entire hash chain (test-only operation)"
        );
        self.entries.clear();
    }
}
